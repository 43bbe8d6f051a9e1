//! # Collaborator Store Traits
//!
//! The flows in this crate never talk to storage directly; they run against
//! these two traits. Production wires them to SQLite (`apotek-db`), tests
//! wire them to the in-memory implementations in [`crate::memory`].
//!
//! ## Contract Notes
//! - `apply_stock_levels` is one batched write: all rows land or the call
//!   errors as a whole. Rows carry `min_stock`/`max_stock` explicitly -
//!   the upsert replaces the full row, so a writer that omitted the
//!   thresholds would null them out.
//! - `insert_transaction` assigns the id; the caller keeps it for the
//!   compensating `delete_transaction`.
//! - `delete_transaction` of an id that no longer exists is not an error
//!   (compensation must be safe to attempt exactly once, even racing a
//!   manual cleanup).

use async_trait::async_trait;
use thiserror::Error;

use apotek_core::{NewTransaction, ProductLot, StockLevel};

// =============================================================================
// Store Error
// =============================================================================

/// Transport-agnostic failure from a collaborator store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store refused or failed the operation.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Inventory Store
// =============================================================================

/// Lot and pool-stock lookup plus the batched inventory delta write.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Lots of `product_id` held in `warehouse_id`, in storage order.
    /// Eligibility filtering (on-hand > 0) is the caller's concern.
    async fn lots_for_product(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> StoreResult<Vec<ProductLot>>;

    /// Current pool stock row for `(product_id, warehouse_id)`, if any.
    async fn stock_level(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> StoreResult<Option<StockLevel>>;

    /// Upserts every row as one batched write.
    async fn apply_stock_levels(&self, levels: &[StockLevel]) -> StoreResult<()>;
}

// =============================================================================
// Ledger Store
// =============================================================================

/// The financial ledger: insert and (compensating) delete.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persists the entry and returns the assigned id.
    async fn insert_transaction(&self, tx: &NewTransaction) -> StoreResult<String>;

    /// Removes an entry. Used only as the compensating action of a failed
    /// settlement; deleting an already-absent id succeeds.
    async fn delete_transaction(&self, id: &str) -> StoreResult<()>;
}
