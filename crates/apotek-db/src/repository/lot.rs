//! # Lot Repository
//!
//! Database operations for product lots.
//!
//! Lot rows are created by inventory receipt and decremented either by a
//! confirmed allocation ([`consume_selections`](LotRepository::consume_selections))
//! or by corrections ([`adjust_quantity`](LotRepository::adjust_quantity)).
//! Quantities never go below zero; the schema CHECK backs up the guards here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use apotek_core::{LotSelection, ProductLot};

use crate::error::{DbError, DbResult};

const LOT_COLUMNS: &str = "id, product_id, warehouse_id, lot_number, batch_code, \
     expiry_date, quantity, created_at, updated_at";

/// Repository for product lot database operations.
#[derive(Debug, Clone)]
pub struct LotRepository {
    pool: SqlitePool,
}

impl LotRepository {
    /// Creates a new LotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LotRepository { pool }
    }

    /// Inserts a lot (inventory receipt).
    pub async fn insert(&self, lot: &ProductLot) -> DbResult<()> {
        debug!(id = %lot.id, lot_number = %lot.lot_number, quantity = lot.quantity, "Inserting lot");

        sqlx::query(
            r#"
            INSERT INTO product_lots (
                id, product_id, warehouse_id, lot_number, batch_code,
                expiry_date, quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&lot.id)
        .bind(&lot.product_id)
        .bind(&lot.warehouse_id)
        .bind(&lot.lot_number)
        .bind(&lot.batch_code)
        .bind(lot.expiry_date)
        .bind(lot.quantity)
        .bind(lot.created_at)
        .bind(lot.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a lot by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductLot>> {
        let lot = sqlx::query_as::<_, ProductLot>(&format!(
            "SELECT {LOT_COLUMNS} FROM product_lots WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lot)
    }

    /// Lots of a product in a warehouse, soonest expiry first, undated last.
    ///
    /// Includes emptied lots; eligibility filtering (on-hand > 0) belongs to
    /// the allocation workflow.
    pub async fn lots_for_product(
        &self,
        product_id: &str,
        warehouse_id: &str,
    ) -> DbResult<Vec<ProductLot>> {
        let lots = sqlx::query_as::<_, ProductLot>(&format!(
            r#"
            SELECT {LOT_COLUMNS} FROM product_lots
            WHERE product_id = ?1 AND warehouse_id = ?2
            ORDER BY expiry_date IS NULL, expiry_date, lot_number
            "#
        ))
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lots)
    }

    /// Decrements lot quantities for a confirmed allocation, all in one
    /// transaction.
    ///
    /// If any lot no longer holds the selected quantity (sold down since
    /// the operator picked it), the whole batch rolls back with
    /// [`DbError::InsufficientLotStock`].
    pub async fn consume_selections(&self, selections: &[LotSelection]) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for selection in selections {
            let result = sqlx::query(
                r#"
                UPDATE product_lots
                SET quantity = quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND quantity >= ?2
                "#,
            )
            .bind(&selection.lot_id)
            .bind(selection.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls everything back.
                return Err(DbError::InsufficientLotStock {
                    lot_id: selection.lot_id.clone(),
                    requested: selection.quantity,
                });
            }
        }

        tx.commit().await?;
        debug!(selections = selections.len(), "Consumed allocation selections");
        Ok(())
    }

    /// Adjusts a lot quantity by a signed delta (receipt top-up or
    /// correction), refusing to go below zero.
    pub async fn adjust_quantity(&self, lot_id: &str, delta: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE product_lots
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity + ?2 >= 0
            "#,
        )
        .bind(lot_id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            if self.get_by_id(lot_id).await?.is_none() {
                return Err(DbError::not_found("Lot", lot_id));
            }
            return Err(DbError::InsufficientLotStock {
                lot_id: lot_id.to_string(),
                requested: -delta,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
