//! # Combo Repository
//!
//! Database operations for combo definitions.
//!
//! A combo is stored as a header row plus ordered `combo_items` rows; the
//! repository always assembles the full [`Combo`] with its items so callers
//! can hand it straight to an allocation run.

use sqlx::{Row, SqlitePool};
use tracing::debug;

use apotek_core::{Combo, ComboItem};

use crate::error::DbResult;

/// Repository for combo database operations.
#[derive(Debug, Clone)]
pub struct ComboRepository {
    pool: SqlitePool,
}

impl ComboRepository {
    /// Creates a new ComboRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ComboRepository { pool }
    }

    /// Inserts a combo and its items in one transaction.
    pub async fn insert(&self, combo: &Combo) -> DbResult<()> {
        debug!(id = %combo.id, name = %combo.name, items = combo.items.len(), "Inserting combo");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO combos (id, name, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&combo.id)
        .bind(&combo.name)
        .bind(combo.is_active)
        .bind(combo.created_at)
        .bind(combo.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in combo.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO combo_items (
                    combo_id, product_id, product_name,
                    quantity_per_set, lot_tracked, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&combo.id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity_per_set)
            .bind(item.lot_tracked)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a combo with its items, in definition order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Combo>> {
        let header = sqlx::query(
            "SELECT id, name, is_active, created_at, updated_at FROM combos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = header else {
            return Ok(None);
        };

        let items = self.items_for(id).await?;

        Ok(Some(Combo {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            items,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }

    /// Lists active combos with their items.
    pub async fn list_active(&self) -> DbResult<Vec<Combo>> {
        let headers = sqlx::query(
            r#"
            SELECT id, name, is_active, created_at, updated_at
            FROM combos
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut combos = Vec::with_capacity(headers.len());
        for row in headers {
            let id: String = row.try_get("id")?;
            let items = self.items_for(&id).await?;
            combos.push(Combo {
                id,
                name: row.try_get("name")?,
                is_active: row.try_get("is_active")?,
                items,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            });
        }

        Ok(combos)
    }

    /// Items of one combo, in definition order.
    async fn items_for(&self, combo_id: &str) -> DbResult<Vec<ComboItem>> {
        let items = sqlx::query_as::<_, ComboItem>(
            r#"
            SELECT product_id, product_name, quantity_per_set, lot_tracked
            FROM combo_items
            WHERE combo_id = ?1
            ORDER BY position
            "#,
        )
        .bind(combo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use apotek_core::Product;
    use chrono::Utc;
    use uuid::Uuid;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, sku: &str) -> String {
        let now = Utc::now();
        let p = Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            barcode: None,
            name: sku.to_string(),
            description: None,
            price_minor: 10_000,
            lot_tracked: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&p).await.unwrap();
        p.id
    }

    fn combo(id: &str, name: &str, items: Vec<ComboItem>) -> Combo {
        let now = Utc::now();
        Combo {
            id: id.to_string(),
            name: name.to_string(),
            is_active: true,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_item_order() {
        let db = db().await;
        let p1 = seed_product(&db, "PCM-500").await;
        let p2 = seed_product(&db, "VIT-C").await;

        let c = combo(
            "combo-1",
            "Flu pack",
            vec![
                ComboItem {
                    product_id: p1.clone(),
                    product_name: "Paracetamol 500mg".to_string(),
                    quantity_per_set: 2,
                    lot_tracked: true,
                },
                ComboItem {
                    product_id: p2.clone(),
                    product_name: "Vitamin C".to_string(),
                    quantity_per_set: 1,
                    lot_tracked: false,
                },
            ],
        );
        db.combos().insert(&c).await.unwrap();

        let fetched = db.combos().get_by_id("combo-1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Flu pack");
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.items[0].product_id, p1);
        assert_eq!(fetched.items[0].quantity_per_set, 2);
        assert_eq!(fetched.items[1].product_id, p2);
        assert!(!fetched.items[1].lot_tracked);
    }

    #[tokio::test]
    async fn test_get_missing_combo() {
        let db = db().await;
        assert!(db.combos().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_item_for_unknown_product_rejected() {
        let db = db().await;
        let c = combo(
            "combo-1",
            "Broken",
            vec![ComboItem {
                product_id: "no-such-product".to_string(),
                product_name: "Ghost".to_string(),
                quantity_per_set: 1,
                lot_tracked: true,
            }],
        );

        // FK enforcement rolls the whole combo back.
        assert!(db.combos().insert(&c).await.is_err());
        assert!(db.combos().get_by_id("combo-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active() {
        let db = db().await;
        let p1 = seed_product(&db, "PCM-500").await;

        let mut inactive = combo(
            "combo-2",
            "Old pack",
            vec![ComboItem {
                product_id: p1.clone(),
                product_name: "Paracetamol 500mg".to_string(),
                quantity_per_set: 1,
                lot_tracked: true,
            }],
        );
        inactive.is_active = false;

        db.combos().insert(&inactive).await.unwrap();
        db.combos()
            .insert(&combo(
                "combo-1",
                "Flu pack",
                vec![ComboItem {
                    product_id: p1,
                    product_name: "Paracetamol 500mg".to_string(),
                    quantity_per_set: 2,
                    lot_tracked: true,
                }],
            ))
            .await
            .unwrap();

        let active = db.combos().list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "combo-1");
        assert_eq!(active[0].items.len(), 1);
    }
}
