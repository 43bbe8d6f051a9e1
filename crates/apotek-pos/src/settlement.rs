//! # Sale Settlement Flow
//!
//! Given a finalized cart, persist one ledger entry and apply inventory
//! deltas for every sold item.
//!
//! ## Write Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Settlement Sequence                              │
//! │                                                                         │
//! │  1. Build ledger entry (income, collected, cart total)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. insert_transaction ──fail──► LedgerWrite (nothing to roll back)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Read stock rows, compute post-sale quantities                       │
//! │     (min/max thresholds carried forward unchanged)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. apply_stock_levels (one batched write)                              │
//! │       │                                                                 │
//! │       ├──ok──────► SettlementReceipt { transaction_id }                 │
//! │       │                                                                 │
//! │       └──fail──► 5. delete_transaction (compensating action)            │
//! │                      ├──ok───► InventoryWrite (ledger rolled back)      │
//! │                      └──fail─► CompensationFailed (manual reconcile)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Limitation: Not Atomic
//! The ledger and inventory writes are two independent network operations
//! sequenced from this process; there is no shared transaction boundary. A
//! crash between steps 2 and 5 leaves an orphaned ledger entry whose
//! compensating delete never runs. Likewise nothing here locks or versions
//! the stock rows: two concurrent settlements of the same product can both
//! read the pre-sale quantity and independently subtract, losing one of the
//! updates. Both gaps are accepted under the single-operator, low-contention
//! deployment this targets. Closing them means moving both writes behind a
//! single backend-side transaction, or versioning the stock rows - not
//! adding retries here.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use apotek_core::{
    validation, CartItem, Money, NewTransaction, PaymentMethod, StockLevel, TransactionKind,
    TransactionStatus,
};

use crate::error::{PosError, PosResult};
use crate::stores::{InventoryStore, LedgerStore, StoreError};

// =============================================================================
// Request / Receipt
// =============================================================================

/// A finalized cart handed over for settlement.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SaleRequest {
    /// Cart lines. Consumed once; the flow retains nothing.
    pub items: Vec<CartItem>,
    /// Cart total as computed at the register.
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub warehouse_id: String,
    /// Operator who rang up the sale.
    pub created_by: String,
    /// Fund the income posts to.
    pub fund_id: String,
}

/// Proof of a completed settlement.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SettlementReceipt {
    /// Id of the ledger entry recording the sale.
    pub transaction_id: String,
}

// =============================================================================
// Settlement Flow
// =============================================================================

/// Executes sale settlements against a ledger store and an inventory store.
///
/// Owns no persistent state beyond the single ledger entry and stock row
/// updates it performs per invocation.
pub struct SaleSettlement<L, I> {
    ledger: L,
    inventory: I,
}

impl<L, I> SaleSettlement<L, I>
where
    L: LedgerStore,
    I: InventoryStore,
{
    /// Creates a settlement flow over the given stores.
    pub fn new(ledger: L, inventory: I) -> Self {
        SaleSettlement { ledger, inventory }
    }

    /// Settles a sale: one ledger entry, then the batched inventory deltas.
    ///
    /// ## Failure Contract
    /// - Ledger write fails → [`PosError::LedgerWrite`], no inventory effect.
    /// - Inventory read/write fails → compensating delete of the ledger
    ///   entry, then [`PosError::InventoryWrite`].
    /// - Compensating delete fails too → [`PosError::CompensationFailed`],
    ///   naming the orphaned entry for manual reconciliation.
    pub async fn settle(&self, request: &SaleRequest) -> PosResult<SettlementReceipt> {
        if request.items.is_empty() {
            return Err(PosError::EmptyCart);
        }
        validation::validate_sale_total(request.total)?;

        // Step 1-2: record the income. POS sales settle immediately; they
        // are not subject to the approval workflow.
        let entry = NewTransaction {
            fund_id: request.fund_id.clone(),
            kind: TransactionKind::Income,
            amount_minor: request.total.minor(),
            payment_method: request.payment_method,
            status: TransactionStatus::Collected,
            description: format!(
                "POS sale at warehouse {} ({} line(s))",
                request.warehouse_id,
                request.items.len()
            ),
            created_by: request.created_by.clone(),
            warehouse_id: request.warehouse_id.clone(),
        };

        let transaction_id = self
            .ledger
            .insert_transaction(&entry)
            .await
            .map_err(PosError::LedgerWrite)?;
        info!(
            transaction_id = %transaction_id,
            total = %request.total,
            method = ?request.payment_method,
            "Sale recorded in ledger"
        );

        // Step 3-4: compute and apply post-sale stock rows. Any failure from
        // here on leaves an already-written ledger entry, so it is
        // compensated before propagating.
        match self.apply_inventory(request).await {
            Ok(()) => Ok(SettlementReceipt { transaction_id }),
            Err(inventory_error) => Err(self.compensate(transaction_id, inventory_error).await),
        }
    }

    /// Reads current stock and applies the post-sale rows as one batch.
    async fn apply_inventory(&self, request: &SaleRequest) -> Result<(), StoreError> {
        // Aggregate sold quantities per product first: a cart may carry the
        // same product on several lines, and each (product, warehouse) row
        // must be read and written exactly once.
        let mut sold: BTreeMap<&str, i64> = BTreeMap::new();
        for item in &request.items {
            *sold.entry(item.product_id.as_str()).or_insert(0) += item.quantity;
        }

        let mut levels = Vec::with_capacity(sold.len());
        for (product_id, quantity) in sold {
            let current = self
                .inventory
                .stock_level(product_id, &request.warehouse_id)
                .await?
                .unwrap_or(StockLevel {
                    product_id: product_id.to_string(),
                    warehouse_id: request.warehouse_id.clone(),
                    quantity: 0,
                    min_stock: None,
                    max_stock: None,
                });

            debug!(
                product_id,
                current = current.quantity,
                sold = quantity,
                "Computing post-sale stock"
            );

            // min/max carried forward unchanged: the upsert replaces the
            // whole row and omitted thresholds would be nulled out.
            levels.push(StockLevel {
                quantity: current.quantity - quantity,
                ..current
            });
        }

        self.inventory.apply_stock_levels(&levels).await
    }

    /// Runs the single best-effort compensating delete and maps the outcome.
    async fn compensate(&self, transaction_id: String, inventory_error: StoreError) -> PosError {
        warn!(
            transaction_id = %transaction_id,
            error = %inventory_error,
            "Inventory write failed; rolling back ledger entry"
        );

        match self.ledger.delete_transaction(&transaction_id).await {
            Ok(()) => PosError::InventoryWrite {
                transaction_id,
                source: inventory_error,
            },
            Err(compensation_error) => {
                warn!(
                    transaction_id = %transaction_id,
                    error = %compensation_error,
                    "Compensating delete failed; ledger entry is orphaned"
                );
                PosError::CompensationFailed {
                    transaction_id,
                    inventory_error,
                    compensation_error,
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
