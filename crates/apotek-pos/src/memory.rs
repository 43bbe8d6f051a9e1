//! # In-Memory Stores
//!
//! In-memory implementations of the collaborator store traits, with failure
//! injection switches for exercising the settlement compensation paths.
//! Used by the tests in this crate; also handy for demo wiring.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use apotek_core::{FinancialTransaction, NewTransaction, ProductLot, StockLevel};

use crate::stores::{InventoryStore, LedgerStore, StoreError, StoreResult};

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Default)]
struct InventoryState {
    lots: Vec<ProductLot>,
    /// Keyed by (product_id, warehouse_id).
    stock: HashMap<(String, String), StockLevel>,
    fail_on_fetch: bool,
    fail_on_apply: bool,
}

/// In-memory inventory store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<RwLock<InventoryState>>,
}

impl InMemoryInventoryStore {
    /// Creates an empty in-memory inventory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lot to the store.
    pub fn add_lot(&self, lot: ProductLot) {
        self.state.write().unwrap().lots.push(lot);
    }

    /// Sets the pool stock row for the level's (product, warehouse) pair.
    pub fn set_stock(&self, level: StockLevel) {
        self.state
            .write()
            .unwrap()
            .stock
            .insert((level.product_id.clone(), level.warehouse_id.clone()), level);
    }

    /// Configures the store to fail lot/stock reads.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Configures the store to fail the batched stock write.
    pub fn set_fail_on_apply(&self, fail: bool) {
        self.state.write().unwrap().fail_on_apply = fail;
    }

    /// Current stock row, for assertions.
    pub fn stock_of(&self, product_id: &str, warehouse_id: &str) -> Option<StockLevel> {
        self.state
            .read()
            .unwrap()
            .stock
            .get(&(product_id.to_string(), warehouse_id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn lots_for_product(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> StoreResult<Vec<ProductLot>> {
        let state = self.state.read().unwrap();
        if state.fail_on_fetch {
            return Err(StoreError::Backend("inventory lookup refused".to_string()));
        }
        Ok(state
            .lots
            .iter()
            .filter(|lot| lot.product_id == product_id && lot.warehouse_id == warehouse_id)
            .cloned()
            .collect())
    }

    async fn stock_level(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> StoreResult<Option<StockLevel>> {
        let state = self.state.read().unwrap();
        if state.fail_on_fetch {
            return Err(StoreError::Backend("inventory lookup refused".to_string()));
        }
        Ok(state
            .stock
            .get(&(product_id.to_string(), warehouse_id.to_string()))
            .cloned())
    }

    async fn apply_stock_levels(&self, levels: &[StockLevel]) -> StoreResult<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_apply {
            return Err(StoreError::Backend("inventory write refused".to_string()));
        }
        for level in levels {
            state.stock.insert(
                (level.product_id.clone(), level.warehouse_id.clone()),
                level.clone(),
            );
        }
        Ok(())
    }
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Default)]
struct LedgerState {
    transactions: HashMap<String, FinancialTransaction>,
    next_id: u32,
    fail_on_insert: bool,
    fail_on_delete: bool,
}

/// In-memory ledger store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail the next insert.
    pub fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_insert = fail;
    }

    /// Configures the store to fail the next delete (compensation failure).
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.state.write().unwrap().fail_on_delete = fail;
    }

    /// Number of ledger entries currently stored.
    pub fn transaction_count(&self) -> usize {
        self.state.read().unwrap().transactions.len()
    }

    /// Looks up an entry by id, for assertions.
    pub fn get(&self, id: &str) -> Option<FinancialTransaction> {
        self.state.read().unwrap().transactions.get(id).cloned()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_transaction(&self, tx: &NewTransaction) -> StoreResult<String> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_insert {
            return Err(StoreError::Backend("ledger insert refused".to_string()));
        }

        state.next_id += 1;
        let id = format!("TRX-{:04}", state.next_id);
        let record = FinancialTransaction {
            id: id.clone(),
            fund_id: tx.fund_id.clone(),
            kind: tx.kind,
            amount_minor: tx.amount_minor,
            payment_method: tx.payment_method,
            status: tx.status,
            description: tx.description.clone(),
            created_by: tx.created_by.clone(),
            warehouse_id: tx.warehouse_id.clone(),
            created_at: Utc::now(),
        };
        state.transactions.insert(id.clone(), record);
        Ok(id)
    }

    async fn delete_transaction(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_delete {
            return Err(StoreError::Backend("ledger delete refused".to_string()));
        }
        state.transactions.remove(id);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use apotek_core::{PaymentMethod, TransactionKind, TransactionStatus};
    use chrono::NaiveDate;

    fn lot(id: &str, product_id: &str, warehouse_id: &str, quantity: i64) -> ProductLot {
        ProductLot {
            id: id.to_string(),
            product_id: product_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            lot_number: id.to_uppercase(),
            batch_code: None,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            quantity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn new_tx(amount: i64) -> NewTransaction {
        NewTransaction {
            fund_id: "fund-1".to_string(),
            kind: TransactionKind::Income,
            amount_minor: amount,
            payment_method: PaymentMethod::Cash,
            status: TransactionStatus::Collected,
            description: "test".to_string(),
            created_by: "op-1".to_string(),
            warehouse_id: "w-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lots_filtered_by_product_and_warehouse() {
        let store = InMemoryInventoryStore::new();
        store.add_lot(lot("l1", "p-1", "w-1", 5));
        store.add_lot(lot("l2", "p-1", "w-2", 5));
        store.add_lot(lot("l3", "p-2", "w-1", 5));

        let lots = store.lots_for_product("p-1", "w-1").await.unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].id, "l1");
    }

    #[tokio::test]
    async fn test_fetch_failure_injection() {
        let store = InMemoryInventoryStore::new();
        store.set_fail_on_fetch(true);
        assert!(store.lots_for_product("p-1", "w-1").await.is_err());

        store.set_fail_on_fetch(false);
        assert!(store.lots_for_product("p-1", "w-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_apply_stock_levels_upserts() {
        let store = InMemoryInventoryStore::new();
        let level = StockLevel {
            product_id: "p-1".to_string(),
            warehouse_id: "w-1".to_string(),
            quantity: 7,
            min_stock: Some(2),
            max_stock: Some(50),
        };
        store.apply_stock_levels(&[level.clone()]).await.unwrap();
        assert_eq!(store.stock_of("p-1", "w-1"), Some(level));
    }

    #[tokio::test]
    async fn test_ledger_insert_and_delete() {
        let store = InMemoryLedgerStore::new();
        let id = store.insert_transaction(&new_tx(150_000)).await.unwrap();
        assert_eq!(store.transaction_count(), 1);
        assert_eq!(store.get(&id).unwrap().amount_minor, 150_000);

        store.delete_transaction(&id).await.unwrap();
        assert_eq!(store.transaction_count(), 0);

        // Deleting an absent id is not an error.
        store.delete_transaction(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_sequential_transaction_ids() {
        let store = InMemoryLedgerStore::new();
        let a = store.insert_transaction(&new_tx(1)).await.unwrap();
        let b = store.insert_transaction(&new_tx(2)).await.unwrap();
        assert_eq!(a, "TRX-0001");
        assert_eq!(b, "TRX-0002");
    }
}
