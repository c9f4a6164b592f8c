use crate::domain::job::{advance, JobStatus, StatusAdvance};
use crate::notify::{Channel, Priority};
use anyhow::anyhow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_id: Uuid,
    pub record_id: Uuid,
    pub channel: Channel,
    pub recipient: String,
    pub priority: Priority,
}

/// Result of applying one delivery callback against the stored job.
#[derive(Debug, Clone)]
pub struct CallbackAdvance {
    pub job_id: Uuid,
    pub record_id: Uuid,
    pub recipient: String,
    pub previous: JobStatus,
    pub advance: StatusAdvance,
}

#[derive(Clone)]
pub struct JobsRepo {
    pub pool: PgPool,
}

impl JobsRepo {
    pub async fn insert_queued(&self, job: &NewJob) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_jobs (job_id, record_id, channel, recipient, priority, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(job.job_id)
        .bind(job.record_id)
        .bind(job.channel.as_str())
        .bind(&job.recipient)
        .bind(job.priority.as_str())
        .bind(JobStatus::Queued.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn mark_sent(&self, job_id: Uuid, external_message_id: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_jobs
            SET status = $2, external_message_id = $3, updated_at = now()
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Sent.as_str())
        .bind(external_message_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn mark_failed(
        &self,
        job_id: Uuid,
        error_code: Option<&str>,
        error_message: Option<&str>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_jobs
            SET status = $2, error_code = $3, error_message = $4, updated_at = now()
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Failed.as_str())
        .bind(error_code)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a delivery callback under a row lock so replayed webhooks
    /// serialize against each other. Only a genuine advance mutates the row;
    /// duplicates and regressions come back as-is for the caller to ignore.
    pub async fn advance_by_external_id(
        &self,
        external_message_id: &str,
        incoming: JobStatus,
        error_code: Option<&str>,
        error_message: Option<&str>,
    ) -> anyhow::Result<Option<CallbackAdvance>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT job_id, record_id, recipient, status
            FROM notification_jobs
            WHERE external_message_id = $1
            FOR UPDATE
            "#,
        )
        .bind(external_message_id)
        .fetch_optional(tx.as_mut())
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let raw: String = row.get("status");
        let previous = JobStatus::parse(&raw)
            .ok_or_else(|| anyhow!("unknown job status in store: {raw}"))?;
        let outcome = advance(previous, incoming);

        if outcome == StatusAdvance::Advance {
            sqlx::query(
                r#"
                UPDATE notification_jobs
                SET status = $2, error_code = $3, error_message = $4, updated_at = now()
                WHERE external_message_id = $1
                "#,
            )
            .bind(external_message_id)
            .bind(incoming.as_str())
            .bind(error_code)
            .bind(error_message)
            .execute(tx.as_mut())
            .await?;
        }

        tx.commit().await?;

        Ok(Some(CallbackAdvance {
            job_id: row.get("job_id"),
            record_id: row.get("record_id"),
            recipient: row.get("recipient"),
            previous,
            advance: outcome,
        }))
    }
}
