//! In-memory audit storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use super::AuditStorage;
use crate::audit::record::AuditRecord;
use crate::error::Error;

/// Audit storage holding records in a vector
///
/// The mutex is never held across `.await` points.
#[derive(Debug, Default)]
pub struct InMemoryAuditStorage {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records, oldest append first
    pub fn records(&self) -> Vec<AuditRecord> {
        self.lock().clone()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AuditRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AuditStorage for InMemoryAuditStorage {
    async fn append(&self, record: AuditRecord) -> Result<(), Error> {
        self.lock().push(record);
        Ok(())
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|record| record.created_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
