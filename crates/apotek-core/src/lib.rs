//! # apotek-core: Pure Business Logic for Apotek POS
//!
//! This crate is the **heart** of Apotek POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Apotek POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Web Frontends                              │   │
//! │  │    POS UI ──► Combo Builder ──► Cashier ──► Finance             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apotek-pos (flows)                           │   │
//! │  │    AllocationSession, SaleSettlement, store traits              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ apotek-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ allocation │  │  expiry   │  │   │
//! │  │   │  Combo    │  │   Money   │  │ Allocation │  │  buckets  │  │   │
//! │  │   │  Lot      │  │  minor    │  │    Run     │  │  urgency  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Combo, ProductLot, transactions, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`expiry`] - Lot expiry urgency buckets and ordering
//! - [`allocation`] - Lot allocation state machine for combo builds
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here ("today" is a parameter)
//! 3. **Integer Money**: All monetary values are in minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod expiry;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use apotek_core::Money` instead of
// `use apotek_core::money::Money`

pub use allocation::{AllocationRun, Step};
pub use error::{AllocationError, CoreError, ValidationError};
pub use expiry::ExpiryBucket;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of combo sets a single allocation run may request.
///
/// ## Business Reason
/// Prevents accidental over-building (e.g., typing 1000 instead of 10).
/// Can be made configurable per store in future versions.
pub const MAX_COMBO_SETS: i64 = 999;

/// Maximum line items allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in a cart line.
pub const MAX_ITEM_QUANTITY: i64 = 999;
