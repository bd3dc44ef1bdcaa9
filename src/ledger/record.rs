use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::gate::TrialPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UsageRecord {
    pub identifier: String,
    pub usage_count: i64,
    pub last_used_date: NaiveDate,
    pub is_paid: bool,
    pub contact_email: Option<String>,
}

const COLUMNS: &str = "identifier, usage_count, last_used_date, is_paid, contact_email";

impl UsageRecord {
    pub async fn find(pool: &SqlitePool, identifier: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UsageRecord>(&format!(
            "SELECT {COLUMNS} FROM usage_records WHERE identifier = ?"
        ))
        .bind(identifier)
        .fetch_optional(pool)
        .await
    }

    pub async fn get_or_create(
        pool: &SqlitePool,
        identifier: &str,
        today: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO usage_records (identifier, usage_count, last_used_date, is_paid)
            VALUES (?, 0, ?, FALSE)
            ON CONFLICT(identifier) DO NOTHING
            "#,
        )
        .bind(identifier)
        .bind(today)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            tracing::info!(identifier, "Created usage record");
        }

        Self::find(pool, identifier)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Read-and-reconcile. Persists the reset when the trial window has elapsed.
    pub async fn reconcile(
        pool: &SqlitePool,
        identifier: &str,
        policy: &TrialPolicy,
        today: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        let record = Self::get_or_create(pool, identifier, today).await?;
        if !policy.window_elapsed(record.last_used_date, today) {
            return Ok(record);
        }

        tracing::info!(
            identifier,
            last_used = %record.last_used_date,
            previous_count = record.usage_count,
            "Trial window elapsed, resetting usage"
        );

        sqlx::query_as::<_, UsageRecord>(&format!(
            r#"
            UPDATE usage_records
            SET usage_count = 0, last_used_date = ?
            WHERE identifier = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(today)
        .bind(identifier)
        .fetch_one(pool)
        .await
    }

    // single-statement add, no lost updates; the gate is checked separately by the caller
    pub async fn increment(
        pool: &SqlitePool,
        identifier: &str,
        today: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UsageRecord>(&format!(
            r#"
            INSERT INTO usage_records (identifier, usage_count, last_used_date, is_paid)
            VALUES (?, 1, ?, FALSE)
            ON CONFLICT(identifier) DO UPDATE
            SET usage_count = usage_count + 1, last_used_date = excluded.last_used_date
            RETURNING {COLUMNS}
            "#
        ))
        .bind(identifier)
        .bind(today)
        .fetch_one(pool)
        .await
    }

    // latest email wins; is_paid is never written back to false
    pub async fn mark_paid(
        pool: &SqlitePool,
        identifier: &str,
        email: &str,
        today: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UsageRecord>(&format!(
            r#"
            INSERT INTO usage_records (identifier, usage_count, last_used_date, is_paid, contact_email)
            VALUES (?, 0, ?, TRUE, ?)
            ON CONFLICT(identifier) DO UPDATE
            SET is_paid = TRUE, contact_email = excluded.contact_email
            RETURNING {COLUMNS}
            "#
        ))
        .bind(identifier)
        .bind(today)
        .bind(email)
        .fetch_one(pool)
        .await
    }
}
