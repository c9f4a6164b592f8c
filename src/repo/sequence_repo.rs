use crate::domain::receipt::ReceiptCategory;
use sqlx::{PgPool, Postgres, Row, Transaction};

#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct SequenceRepo {
    pub pool: PgPool,
}

impl SequenceRepo {
    pub async fn allocate(
        &self,
        category: ReceiptCategory,
        date_bucket: &str,
    ) -> Result<i64, SequenceError> {
        let mut tx = self.pool.begin().await?;
        let value = Self::allocate_tx(&mut tx, category, date_bucket).await?;
        tx.commit().await?;
        Ok(value)
    }

    /// Read-or-create plus increment as one statement so two concurrent
    /// callers for the same (category, date) key can never observe the same
    /// value. Postgres row locking on the upsert carries the whole invariant;
    /// no in-process lock is involved, so multiple instances stay correct.
    pub async fn allocate_tx(
        tx: &mut Transaction<'_, Postgres>,
        category: ReceiptCategory,
        date_bucket: &str,
    ) -> Result<i64, SequenceError> {
        let row = sqlx::query(
            r#"
            INSERT INTO daily_sequences (category, seq_date, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (category, seq_date)
            DO UPDATE SET last_value = daily_sequences.last_value + 1, updated_at = now()
            RETURNING last_value
            "#,
        )
        .bind(category.as_str())
        .bind(date_bucket)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(row.get("last_value"))
    }
}
