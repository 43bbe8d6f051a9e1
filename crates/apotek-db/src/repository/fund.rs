//! # Fund Repository
//!
//! Cash funds and their derived balances.

use sqlx::SqlitePool;

use apotek_core::{Fund, Money};

use crate::error::DbResult;

/// Repository for fund database operations.
#[derive(Debug, Clone)]
pub struct FundRepository {
    pool: SqlitePool,
}

impl FundRepository {
    /// Creates a new FundRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FundRepository { pool }
    }

    /// Inserts a fund.
    pub async fn insert(&self, fund: &Fund) -> DbResult<()> {
        sqlx::query("INSERT INTO funds (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&fund.id)
            .bind(&fund.name)
            .bind(fund.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Gets a fund by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Fund>> {
        let fund = sqlx::query_as::<_, Fund>("SELECT id, name, created_at FROM funds WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(fund)
    }

    /// Balance of a fund: collected income minus collected expenses.
    ///
    /// Pending and cancelled entries don't move money, so they are excluded.
    pub async fn balance(&self, fund_id: &str) -> DbResult<Money> {
        let minor: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(
                CASE kind WHEN 'income' THEN amount_minor ELSE -amount_minor END
            ), 0)
            FROM transactions
            WHERE fund_id = ?1 AND status = 'collected'
            "#,
        )
        .bind(fund_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_minor(minor))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use apotek_core::{NewTransaction, PaymentMethod, TransactionKind, TransactionStatus};
    use chrono::Utc;
    use uuid::Uuid;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn fund(name: &str) -> Fund {
        Fund {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn tx(fund_id: &str, amount: i64, kind: TransactionKind, status: TransactionStatus) -> NewTransaction {
        NewTransaction {
            fund_id: fund_id.to_string(),
            kind,
            amount_minor: amount,
            payment_method: PaymentMethod::Cash,
            status,
            description: "entry".to_string(),
            created_by: "op-1".to_string(),
            warehouse_id: "w-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let f = fund("Register cash");
        db.funds().insert(&f).await.unwrap();

        let fetched = db.funds().get_by_id(&f.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Register cash");
    }

    #[tokio::test]
    async fn test_balance_counts_only_collected() {
        let db = db().await;
        let f = fund("Register cash");
        db.funds().insert(&f).await.unwrap();
        let ledger = db.ledger();

        ledger
            .insert(&tx(&f.id, 150_000, TransactionKind::Income, TransactionStatus::Collected))
            .await
            .unwrap();
        ledger
            .insert(&tx(&f.id, 40_000, TransactionKind::Expense, TransactionStatus::Collected))
            .await
            .unwrap();
        ledger
            .insert(&tx(&f.id, 99_000, TransactionKind::Income, TransactionStatus::Pending))
            .await
            .unwrap();

        let balance = db.funds().balance(&f.id).await.unwrap();
        assert_eq!(balance.minor(), 110_000);
    }

    #[tokio::test]
    async fn test_balance_of_empty_fund_is_zero() {
        let db = db().await;
        let f = fund("Register cash");
        db.funds().insert(&f).await.unwrap();

        assert!(db.funds().balance(&f.id).await.unwrap().is_zero());
    }
}
