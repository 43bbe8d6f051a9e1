//! # Stock Repository
//!
//! Pool stock levels per (product, warehouse) and the batched delta upsert
//! used by sale settlement.

use sqlx::SqlitePool;
use tracing::debug;

use apotek_core::StockLevel;

use crate::error::DbResult;

const STOCK_COLUMNS: &str = "product_id, warehouse_id, quantity, min_stock, max_stock";

/// Repository for pool stock database operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Gets the stock row for a (product, warehouse) pair.
    pub async fn get(&self, product_id: &str, warehouse_id: &str) -> DbResult<Option<StockLevel>> {
        let level = sqlx::query_as::<_, StockLevel>(&format!(
            r#"
            SELECT {STOCK_COLUMNS} FROM stock_levels
            WHERE product_id = ?1 AND warehouse_id = ?2
            "#
        ))
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level)
    }

    /// Upserts every row as one batched write (single transaction).
    ///
    /// The row replaces all columns, `min_stock`/`max_stock` included:
    /// callers carry the thresholds forward explicitly, an upsert built
    /// without them would null them out.
    pub async fn upsert_batch(&self, levels: &[StockLevel]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        for level in levels {
            sqlx::query(
                r#"
                INSERT INTO stock_levels (
                    product_id, warehouse_id, quantity, min_stock, max_stock
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (product_id, warehouse_id) DO UPDATE SET
                    quantity = excluded.quantity,
                    min_stock = excluded.min_stock,
                    max_stock = excluded.max_stock
                "#,
            )
            .bind(&level.product_id)
            .bind(&level.warehouse_id)
            .bind(level.quantity)
            .bind(level.min_stock)
            .bind(level.max_stock)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(rows = levels.len(), "Upserted stock levels");
        Ok(())
    }

    /// Lists all stock rows of a warehouse.
    pub async fn list_for_warehouse(&self, warehouse_id: &str) -> DbResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(&format!(
            r#"
            SELECT {STOCK_COLUMNS} FROM stock_levels
            WHERE warehouse_id = ?1
            ORDER BY product_id
            "#
        ))
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    /// Rows at or below their reorder threshold (for the restock report).
    pub async fn low_stock(&self, warehouse_id: &str) -> DbResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(&format!(
            r#"
            SELECT {STOCK_COLUMNS} FROM stock_levels
            WHERE warehouse_id = ?1
              AND min_stock IS NOT NULL
              AND quantity <= min_stock
            ORDER BY product_id
            "#
        ))
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
