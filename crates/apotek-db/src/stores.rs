//! # Store Trait Implementations
//!
//! Wires [`Database`] into the `apotek-pos` collaborator traits so the
//! allocation session and the settlement flow run unchanged against SQLite.
//!
//! Worth restating here: the settlement flow issues its ledger write and its
//! inventory write as two separate calls through these traits. Each call is
//! transactional on its own, but there is deliberately no transaction
//! spanning both - the compensation logic in `apotek-pos` exists precisely
//! because of that.

use async_trait::async_trait;

use apotek_core::{NewTransaction, ProductLot, StockLevel};
use apotek_pos::{InventoryStore, LedgerStore, StoreError};

use crate::error::DbError;
use crate::pool::Database;

/// Maps database failures onto the transport-agnostic store error.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound { entity, id },
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[async_trait]
impl InventoryStore for Database {
    async fn lots_for_product(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> Result<Vec<ProductLot>, StoreError> {
        Ok(self.lots().lots_for_product(product_id, warehouse_id).await?)
    }

    async fn stock_level(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> Result<Option<StockLevel>, StoreError> {
        Ok(self.stock().get(product_id, warehouse_id).await?)
    }

    async fn apply_stock_levels(&self, levels: &[StockLevel]) -> Result<(), StoreError> {
        Ok(self.stock().upsert_batch(levels).await?)
    }
}

#[async_trait]
impl LedgerStore for Database {
    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<String, StoreError> {
        Ok(self.ledger().insert(tx).await?)
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError> {
        Ok(self.ledger().delete(id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
// Both flows end-to-end against a real (in-memory) SQLite database.
