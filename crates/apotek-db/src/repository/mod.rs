//! # Repository Module
//!
//! Database repository implementations for Apotek POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                                 │
//! │       │  db.lots().lots_for_product(product_id, warehouse_id)           │
//! │       ▼                                                                 │
//! │  LotRepository ── SQL ──► SQLite                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • SQL is isolated in one place per aggregate                           │
//! │  • Store traits can be implemented on top of repositories               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and search
//! - [`combo::ComboRepository`] - Combo definitions with constituent items
//! - [`lot::LotRepository`] - Product lots and allocation consumption
//! - [`stock::StockRepository`] - Pool stock levels and the batched upsert
//! - [`ledger::LedgerRepository`] - Financial transactions
//! - [`fund::FundRepository`] - Cash funds and balances

pub mod combo;
pub mod fund;
pub mod ledger;
pub mod lot;
pub mod product;
pub mod stock;
