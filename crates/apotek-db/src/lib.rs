//! # apotek-db: Database Layer for Apotek POS
//!
//! This crate provides database access for the Apotek POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Apotek POS Data Flow                             │
//! │                                                                         │
//! │  apotek-pos flows (AllocationSession, SaleSettlement)                   │
//! │       │            via InventoryStore / LedgerStore traits              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     apotek-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  product/lot/ │    │  (embedded)  │   │   │
//! │  │   │               │◄───│  stock/combo/ │    │ 001_init.sql │   │   │
//! │  │   │ SqlitePool    │    │  ledger/fund  │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                        SQLite Database (WAL)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, lot, stock, ...)
//! - [`stores`] - `apotek-pos` store-trait implementations on [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apotek_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/apotek.db")).await?;
//!
//! // Repositories
//! let lots = db.lots().lots_for_product(&product_id, "w-1").await?;
//!
//! // Or hand the handle straight to the flows
//! let flow = SaleSettlement::new(db.clone(), db.clone());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod stores;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::combo::ComboRepository;
pub use repository::fund::FundRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::lot::LotRepository;
pub use repository::product::ProductRepository;
pub use repository::stock::StockRepository;
