//! Audit record storage trait and backend implementations
//!
//! The interceptor hands each finished [`AuditRecord`] to an [`AuditStorage`]
//! backend; the retention purger asks the same backend to drop old records.
//! Timeouts and retries for either call belong to the backend.
//!
//! # Available Backends
//!
//! - **In-memory**: always available, for tests and embedded use
//! - **PostgreSQL** (`database` feature): `audit_records` table with a `created_at` index

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::record::AuditRecord;
use crate::error::Error;

mod memory;

#[cfg(feature = "database")]
pub mod pg;

pub use memory::InMemoryAuditStorage;

/// Trait for audit record persistence backends
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Append a finished record; the backend takes ownership
    async fn append(&self, record: AuditRecord) -> Result<(), Error>;

    /// Delete every record created strictly before `cutoff`
    ///
    /// Returns the number of records deleted.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error>;
}
