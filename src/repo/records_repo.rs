use crate::domain::record::{NewRecord, RecordStatus, StoredRecord};
use anyhow::anyhow;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct RecordsRepo {
    pub pool: PgPool,
}

impl RecordsRepo {
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        record: &NewRecord,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO records (
                record_id, receipt_number, category, payer_name, payer_phone, payer_email,
                amount_minor, order_ref, payment_ref, status, details
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11
            )
            "#,
        )
        .bind(record.record_id)
        .bind(&record.receipt_number)
        .bind(record.category.as_str())
        .bind(&record.payer_name)
        .bind(&record.payer_phone)
        .bind(&record.payer_email)
        .bind(record.amount_minor)
        .bind(&record.order_ref)
        .bind(&record.payment_ref)
        .bind(record.status.as_str())
        .bind(serde_json::to_value(&record.details)?)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, record_id: Uuid) -> anyhow::Result<Option<StoredRecord>> {
        let row = sqlx::query(
            r#"
            SELECT record_id, receipt_number, category, payer_name, payer_phone, payer_email,
                   amount_minor, order_ref, payment_ref, status, details, certificate_url, created_at
            FROM records
            WHERE record_id = $1
            "#,
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }

    pub async fn find_by_receipt(
        &self,
        receipt_number: &str,
    ) -> anyhow::Result<Option<StoredRecord>> {
        let row = sqlx::query(
            r#"
            SELECT record_id, receipt_number, category, payer_name, payer_phone, payer_email,
                   amount_minor, order_ref, payment_ref, status, details, certificate_url, created_at
            FROM records
            WHERE receipt_number = $1
            "#,
        )
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }

    /// Row-locked read used by the guarded status transition so two admin
    /// actions on the same record serialize instead of racing.
    pub async fn lock_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        receipt_number: &str,
    ) -> anyhow::Result<Option<(Uuid, RecordStatus)>> {
        let row = sqlx::query(
            r#"
            SELECT record_id, status
            FROM records
            WHERE receipt_number = $1
            FOR UPDATE
            "#,
        )
        .bind(receipt_number)
        .fetch_optional(tx.as_mut())
        .await?;

        row.map(|r| {
            let raw: String = r.get("status");
            let status = RecordStatus::parse(&raw)
                .ok_or_else(|| anyhow!("unknown record status in store: {raw}"))?;
            Ok((r.get("record_id"), status))
        })
        .transpose()
    }

    pub async fn set_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        record_id: Uuid,
        status: RecordStatus,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE records SET status = $2, updated_at = now()
            WHERE record_id = $1
            "#,
        )
        .bind(record_id)
        .bind(status.as_str())
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn set_certificate_url(
        &self,
        record_id: Uuid,
        certificate_url: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE records SET certificate_url = $2, updated_at = now()
            WHERE record_id = $1
            "#,
        )
        .bind(record_id)
        .bind(certificate_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn from_row(r: PgRow) -> anyhow::Result<StoredRecord> {
    let category_raw: String = r.get("category");
    let status_raw: String = r.get("status");

    Ok(StoredRecord {
        record_id: r.get("record_id"),
        receipt_number: r.get("receipt_number"),
        category: crate::domain::receipt::ReceiptCategory::parse(&category_raw)
            .ok_or_else(|| anyhow!("unknown record category in store: {category_raw}"))?,
        payer_name: r.get("payer_name"),
        payer_phone: r.get("payer_phone"),
        payer_email: r.get("payer_email"),
        amount_minor: r.get("amount_minor"),
        order_ref: r.get("order_ref"),
        payment_ref: r.get("payment_ref"),
        status: RecordStatus::parse(&status_raw)
            .ok_or_else(|| anyhow!("unknown record status in store: {status_raw}"))?,
        details: serde_json::from_value(r.get("details"))?,
        certificate_url: r.get("certificate_url"),
        created_at: r.get("created_at"),
    })
}
