//! # Domain Types
//!
//! Core domain types used throughout Apotek POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Combo       │   │   ProductLot    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  name           │   │  lot_number     │       │
//! │  │  price_minor    │   │  items[]        │   │  expiry_date?   │       │
//! │  │  lot_tracked    │   │  is_active      │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌────────────────┐   │
//! │  │  LotSelection   │   │ FinancialTransaction │   │   StockLevel   │   │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ────────────  │   │
//! │  │  lot_id         │   │  kind Income/Expense │   │  quantity      │   │
//! │  │  quantity       │   │  status Collected    │   │  min_stock?    │   │
//! │  └─────────────────┘   └──────────────────────┘   │  max_stock?    │   │
//! │                                                   └────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, lot_number, fund name, etc.) - human-readable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Price in minor currency units.
    pub price_minor: i64,

    /// Whether stock for this product must be consumed from specific lots
    /// rather than an undifferentiated pool.
    pub lot_tracked: bool,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_minor)
    }
}

// =============================================================================
// Combo
// =============================================================================

/// A sellable bundle composed of fixed quantities of underlying products.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Combo {
    pub id: String,
    pub name: String,
    /// Whether the combo may currently be built and sold.
    pub is_active: bool,
    /// Constituent products, in presentation order.
    pub items: Vec<ComboItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Combo {
    /// Returns the constituent items that are lot-tracked, in combo order.
    ///
    /// These are the items an allocation run walks through; pool-stocked
    /// items are deducted directly at settlement and need no lot choice.
    pub fn lot_tracked_items(&self) -> impl Iterator<Item = &ComboItem> {
        self.items.iter().filter(|i| i.lot_tracked)
    }
}

/// One constituent product of a combo.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ComboItem {
    /// Product consumed by this slot of the bundle.
    pub product_id: String,
    /// Product name at time of combo definition (frozen for display).
    pub product_name: String,
    /// Units of the product consumed per combo set. Always positive.
    pub quantity_per_set: i64,
    /// Whether the product's stock is consumed from specific lots.
    pub lot_tracked: bool,
}

// =============================================================================
// Product Lot
// =============================================================================

/// A batch of a single product held in a specific warehouse.
///
/// Lots are created/replenished by inventory receipt (outside this core) and
/// decremented by sale settlement or lot allocation confirmation. The core
/// never creates lots.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductLot {
    pub id: String,
    pub product_id: String,
    pub warehouse_id: String,
    /// Lot number - business identifier printed on the packaging.
    pub lot_number: String,
    /// Manufacturer batch code, when distinct from the lot number.
    pub batch_code: Option<String>,
    /// Expiry date. Absent for products with no dated shelf life.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    /// On-hand quantity. Never negative.
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ProductLot {
    /// Whether the lot can contribute units to an allocation.
    #[inline]
    pub fn has_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Lot Selection
// =============================================================================

/// An assignment of `quantity` units of a specific lot to satisfy part of
/// the required quantity for one constituent product of an allocation run.
///
/// ## Invariants
/// - Per constituent product, selected quantities sum to exactly
///   `quantity_per_set × set_count` before the run may complete.
/// - `quantity` never exceeds the lot's on-hand quantity at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LotSelection {
    pub lot_id: String,
    /// Lot number at selection time (frozen for display and audit).
    pub lot_number: String,
    pub product_id: String,
    /// Units taken from this lot. Always in `[1, lot on-hand]`.
    pub quantity: i64,
}

// =============================================================================
// Cart
// =============================================================================

/// A line in an in-progress sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_minor: i64,
    /// Discount applied to this line, in minor units.
    pub discount_minor: i64,
}

impl CartItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.unit_price_minor)
    }

    /// Line total: unit price × quantity, less the line discount.
    pub fn line_total(&self) -> Money {
        self.unit_price()
            .multiply_quantity(self.quantity)
            .subtract_discount(Money::from_minor(self.discount_minor))
    }
}

/// Sums line totals over a cart.
pub fn cart_total(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

// =============================================================================
// Stock Level
// =============================================================================

/// Pool stock of one product in one warehouse.
///
/// Doubles as the write row for inventory deltas: a writer computing a
/// post-sale row must carry `min_stock`/`max_stock` forward explicitly,
/// because the upsert overwrites the whole row and omitted thresholds
/// would be nulled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockLevel {
    pub product_id: String,
    pub warehouse_id: String,
    pub quantity: i64,
    /// Reorder threshold, if configured.
    pub min_stock: Option<i64>,
    /// Overstock threshold, if configured.
    pub max_stock: Option<i64>,
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Ledger Entry Types
// =============================================================================

/// Direction of a ledger entry against its fund.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// The status of a ledger entry.
///
/// POS sales settle immediately as `Collected`; only back-office entries
/// (purchase requests, reimbursements) pass through `Pending`.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting approval.
    Pending,
    /// Money has moved.
    Collected,
    /// Entry was cancelled before collection.
    Cancelled,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

/// A ledger entry not yet persisted; the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTransaction {
    pub fund_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    /// Free-text description. Settlement includes warehouse context here.
    pub description: String,
    /// Operator who recorded the entry.
    pub created_by: String,
    pub warehouse_id: String,
}

impl NewTransaction {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount_minor)
    }
}

/// A persisted ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct FinancialTransaction {
    pub id: String,
    pub fund_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub description: String,
    pub created_by: String,
    pub warehouse_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl FinancialTransaction {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount_minor)
    }
}

// =============================================================================
// Fund
// =============================================================================

/// A cash fund that ledger entries post against.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Fund {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_line(qty: i64, unit: i64, discount: i64) -> CartItem {
        CartItem {
            product_id: "p-1".to_string(),
            name_snapshot: "Paracetamol 500mg".to_string(),
            quantity: qty,
            unit_price_minor: unit,
            discount_minor: discount,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(cart_line(3, 50_000, 0).line_total().minor(), 150_000);
        assert_eq!(cart_line(2, 10_000, 5_000).line_total().minor(), 15_000);
    }

    #[test]
    fn test_cart_total() {
        let items = vec![cart_line(3, 50_000, 0), cart_line(1, 25_000, 5_000)];
        assert_eq!(cart_total(&items).minor(), 170_000);
    }

    #[test]
    fn test_lot_tracked_items_preserves_order() {
        let combo = Combo {
            id: "c-1".to_string(),
            name: "Flu pack".to_string(),
            is_active: true,
            items: vec![
                ComboItem {
                    product_id: "a".to_string(),
                    product_name: "A".to_string(),
                    quantity_per_set: 2,
                    lot_tracked: true,
                },
                ComboItem {
                    product_id: "b".to_string(),
                    product_name: "B".to_string(),
                    quantity_per_set: 1,
                    lot_tracked: false,
                },
                ComboItem {
                    product_id: "c".to_string(),
                    product_name: "C".to_string(),
                    quantity_per_set: 1,
                    lot_tracked: true,
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let tracked: Vec<&str> = combo
            .lot_tracked_items()
            .map(|i| i.product_id.as_str())
            .collect();
        assert_eq!(tracked, vec!["a", "c"]);
    }

    #[test]
    fn test_transaction_status_default() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::Pending);
    }

    /// The database CHECK constraints and the frontend both rely on these
    /// exact snake_case wire names.
    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"income\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Collected).unwrap(),
            "\"collected\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transfer).unwrap(),
            "\"transfer\""
        );
    }

    #[test]
    fn test_lot_has_stock() {
        let mut lot = ProductLot {
            id: "l-1".to_string(),
            product_id: "p-1".to_string(),
            warehouse_id: "w-1".to_string(),
            lot_number: "PCM-2024-07".to_string(),
            batch_code: None,
            expiry_date: None,
            quantity: 4,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(lot.has_stock());
        lot.quantity = 0;
        assert!(!lot.has_stock());
    }
}
