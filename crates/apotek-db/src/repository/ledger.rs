//! # Ledger Repository
//!
//! Database operations for financial transactions.
//!
//! Inserts assign the id server-side and return it; the settlement flow
//! keeps that id for its compensating delete.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use apotek_core::{FinancialTransaction, NewTransaction};

use crate::error::DbResult;

const TX_COLUMNS: &str = "id, fund_id, kind, amount_minor, payment_method, status, \
     description, created_by, warehouse_id, created_at";

/// Repository for ledger database operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Inserts a ledger entry and returns the assigned id.
    pub async fn insert(&self, tx: &NewTransaction) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, amount = tx.amount_minor, kind = ?tx.kind, "Inserting ledger entry");

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, fund_id, kind, amount_minor, payment_method,
                status, description, created_by, warehouse_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&id)
        .bind(&tx.fund_id)
        .bind(tx.kind)
        .bind(tx.amount_minor)
        .bind(tx.payment_method)
        .bind(tx.status)
        .bind(&tx.description)
        .bind(&tx.created_by)
        .bind(&tx.warehouse_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Deletes a ledger entry.
    ///
    /// Deleting an id that no longer exists succeeds: the compensating
    /// delete of a failed settlement must be safe to attempt even if the
    /// entry was already reconciled away.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, deleted = result.rows_affected(), "Deleted ledger entry");
        Ok(())
    }

    /// Gets a ledger entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<FinancialTransaction>> {
        let tx = sqlx::query_as::<_, FinancialTransaction>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    /// Lists entries of a fund, most recent first.
    pub async fn list_for_fund(
        &self,
        fund_id: &str,
        limit: u32,
    ) -> DbResult<Vec<FinancialTransaction>> {
        let txs = sqlx::query_as::<_, FinancialTransaction>(&format!(
            r#"
            SELECT {TX_COLUMNS} FROM transactions
            WHERE fund_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#
        ))
        .bind(fund_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(txs)
    }

    /// Counts all ledger entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
