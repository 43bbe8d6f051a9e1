//! # apotek-pos: Flow Orchestration for Apotek POS
//!
//! This crate drives the two operator-facing flows of the system against
//! abstract collaborator stores:
//!
//! - **Lot allocation** ([`AllocationSession`]): walks an operator through
//!   choosing inventory lots for every lot-tracked constituent of a combo,
//!   one decision per item, feeding the pure state machine in
//!   `apotek_core::allocation` from an [`InventoryStore`].
//! - **Sale settlement** ([`SaleSettlement`]): records one ledger entry and
//!   applies inventory deltas for a finalized cart, with a compensating
//!   delete when the inventory write fails.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frontend (cashier / combo builder)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apotek-pos (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   AllocationSession ──► apotek-core::AllocationRun              │   │
//! │  │   SaleSettlement    ──► LedgerStore + InventoryStore traits     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │        ┌───────────────────────┴──────────────────────┐                │
//! │        ▼                                              ▼                │
//! │  InMemory stores (tests)                 apotek-db (SQLite)            │
//! │  └─ failure injection                    └─ production storage         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`stores`] - Collaborator store traits and the transport-agnostic error
//! - [`settlement`] - The sale settlement flow
//! - [`session`] - The operator-driven allocation session
//! - [`memory`] - In-memory store implementations with failure injection
//! - [`error`] - Flow error types

pub mod error;
pub mod memory;
pub mod session;
pub mod settlement;
pub mod stores;

pub use error::{PosError, PosResult};
pub use memory::{InMemoryInventoryStore, InMemoryLedgerStore};
pub use session::AllocationSession;
pub use settlement::{SaleRequest, SaleSettlement, SettlementReceipt};
pub use stores::{InventoryStore, LedgerStore, StoreError};
