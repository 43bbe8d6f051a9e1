//! # Flow Error Types
//!
//! Error taxonomy for the two flows:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kind                     recoverable?   operator action                │
//! │  ────────────────────     ────────────   ─────────────────────────      │
//! │  Allocation / Validation  yes            correct the selection/input    │
//! │  LotLookup                yes            retry the fetch                │
//! │  LedgerWrite              fatal          retry the sale (no partial     │
//! │                                          state was written)             │
//! │  InventoryWrite           fatal          retry the sale (ledger entry   │
//! │                                          was compensated away)          │
//! │  CompensationFailed       fatal+manual   reconcile the orphaned ledger  │
//! │                                          entry by hand                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is silently swallowed: every failure propagates to the
//! caller as a distinguishable variant carrying a human-readable message.

use thiserror::Error;

use apotek_core::{AllocationError, ValidationError};

use crate::stores::StoreError;

/// Errors from the allocation session and the settlement flow.
#[derive(Debug, Error)]
pub enum PosError {
    /// Allocation state machine rejected the operation (selection
    /// incomplete, quantity mismatch, out of range, ...). Blocks
    /// progression; the operator corrects the selection.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Input validation failed before the flow ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The inventory lookup failed. Retryable by re-invoking the fetch.
    #[error("Lot lookup failed: {0}")]
    LotLookup(#[source] StoreError),

    /// Settlement was invoked with an empty cart.
    #[error("Cannot settle an empty cart")]
    EmptyCart,

    /// The ledger write failed. The operation failed fast: no inventory
    /// effect exists, nothing to roll back.
    #[error("Ledger write failed: {0}")]
    LedgerWrite(#[source] StoreError),

    /// The inventory write failed after the ledger entry was created. The
    /// compensating delete ran and removed the entry.
    #[error("Inventory write failed (ledger entry {transaction_id} was rolled back): {source}")]
    InventoryWrite {
        transaction_id: String,
        #[source]
        source: StoreError,
    },

    /// The inventory write failed AND the compensating delete failed too.
    /// Ledger entry `transaction_id` is orphaned: it records income for a
    /// sale whose stock was never deducted. Surfaced for manual
    /// reconciliation; the system does not retry or queue the compensation.
    #[error(
        "Inventory write failed and compensation failed; ledger entry {transaction_id} requires manual reconciliation (inventory: {inventory_error}; compensation: {compensation_error})"
    )]
    CompensationFailed {
        transaction_id: String,
        inventory_error: StoreError,
        compensation_error: StoreError,
    },
}

/// Result type for flow operations.
pub type PosResult<T> = Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_transaction() {
        let err = PosError::InventoryWrite {
            transaction_id: "trx-1".to_string(),
            source: StoreError::Backend("disk full".to_string()),
        };
        assert!(err.to_string().contains("trx-1"));

        let err = PosError::CompensationFailed {
            transaction_id: "trx-2".to_string(),
            inventory_error: StoreError::Backend("disk full".to_string()),
            compensation_error: StoreError::Backend("timeout".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("trx-2"));
        assert!(message.contains("manual reconciliation"));
    }

    #[test]
    fn test_allocation_error_converts() {
        let err: PosError = AllocationError::AlreadyComplete.into();
        assert!(matches!(err, PosError::Allocation(_)));
    }
}
