//! PostgreSQL audit storage backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use super::AuditStorage;
use crate::audit::record::AuditRecord;
use crate::config::DatabaseConfig;
use crate::error::Error;

/// PostgreSQL-backed audit storage
pub struct PgAuditStorage {
    pool: PgPool,
}

impl PgAuditStorage {
    /// Create a new PostgreSQL audit storage on an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a dedicated pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| Error::storage("Failed to connect audit database", e))?;
        Ok(Self::new(pool))
    }

    /// Initialize the audit_records table and its retention index
    ///
    /// Should be called once during application startup.
    pub async fn initialize(&self) -> Result<(), Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_records (
                id UUID PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL,
                event_type TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                entity_id TEXT,
                status TEXT NOT NULL,
                details TEXT,
                error_message TEXT,
                duration_ms BIGINT NOT NULL,
                request_id TEXT,
                service_name TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("Failed to create audit_records table", e))?;

        // Retention purges delete by creation time
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_audit_records_created_at ON audit_records (created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("Failed to create audit created_at index", e))?;

        Ok(())
    }
}

#[async_trait]
impl AuditStorage for PgAuditStorage {
    async fn append(&self, record: AuditRecord) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO audit_records (
                id, created_at, event_type, entity_type, entity_id, status,
                details, error_message, duration_ms, request_id, service_name
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(record.created_at)
        .bind(record.event_type.to_string())
        .bind(&record.entity_type)
        .bind(&record.entity_id)
        .bind(record.status.to_string())
        .bind(&record.details)
        .bind(&record.error_message)
        .bind(i64::try_from(record.duration_ms).unwrap_or(i64::MAX))
        .bind(&record.request_id)
        .bind(&record.service_name)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("Failed to append audit record", e))?;

        Ok(())
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM audit_records WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::storage("Failed to purge audit records", e))?;

        Ok(result.rows_affected())
    }
}
