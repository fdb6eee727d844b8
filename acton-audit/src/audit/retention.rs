//! Scheduled purge of audit records past the retention window
//!
//! Once a day, at the configured server-local time, every record whose
//! `created_at` is older than `now - retention_days` is deleted through the
//! storage backend. The schedule runs on its own Tokio task and stops when its
//! [`CancellationToken`] is cancelled.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use acton_audit::audit::{InMemoryAuditStorage, RetentionPurger};
//! use acton_audit::config::RetentionConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> acton_audit::error::Result<()> {
//! let storage = Arc::new(InMemoryAuditStorage::new());
//! let purger = Arc::new(RetentionPurger::new(storage, &RetentionConfig::default())?);
//!
//! let shutdown = CancellationToken::new();
//! let handle = purger.spawn(shutdown.clone());
//!
//! // ... on shutdown
//! shutdown.cancel();
//! let _ = handle.await;
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::storage::AuditStorage;
use crate::config::RetentionConfig;
use crate::error::{Error, Result};

/// Longest DST gap skipped over when the purge time falls inside one
const MAX_GAP_HOURS: i64 = 3;

/// Deletes audit records older than the retention window
pub struct RetentionPurger {
    storage: Arc<dyn AuditStorage>,
    retention_days: u32,
    window: Duration,
    purge_time: NaiveTime,
    enabled: bool,
    running: Mutex<()>,
}

impl RetentionPurger {
    /// Create a purger; fails on an unparsable purge time or an oversized window
    pub fn new(storage: Arc<dyn AuditStorage>, config: &RetentionConfig) -> Result<Self> {
        Ok(Self {
            storage,
            retention_days: config.retention_days,
            window: config.retention_window()?,
            purge_time: config.purge_time()?,
            enabled: config.enabled,
            running: Mutex::new(()),
        })
    }

    /// Retention window in days
    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Time of day the scheduled purge runs
    pub fn purge_time(&self) -> NaiveTime {
        self.purge_time
    }

    /// Oldest `created_at` that survives a purge at `now`
    ///
    /// Fails when the cutoff falls outside the representable date range.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_sub_signed(self.window).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "retention window of {} days before {} is out of range",
                self.retention_days, now
            ))
        })
    }

    /// Purge records older than the window as seen from `now`
    ///
    /// Returns the number of deleted records. Concurrent calls are serialized.
    pub async fn purge_at(&self, now: DateTime<Utc>) -> Result<u64> {
        let _guard = self.running.lock().await;
        let cutoff = self.cutoff(now)?;

        let deleted = self.storage.purge_before(cutoff).await?;
        tracing::info!(
            deleted,
            cutoff = %cutoff,
            retention_days = self.retention_days,
            "Purged expired audit records"
        );
        Ok(deleted)
    }

    /// Purge using the current clock
    pub async fn purge_now(&self) -> Result<u64> {
        self.purge_at(Utc::now()).await
    }

    /// Next occurrence of the purge time strictly after `now`, in `now`'s timezone
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let mut date = now.date_naive();
        loop {
            let candidate = date.and_time(self.purge_time);
            let resolved =
                first_valid_local(candidate, |naive| tz.from_local_datetime(naive).earliest());
            if let Some(at) = resolved.filter(|at| at > now) {
                return at;
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => return now.clone() + Duration::days(1),
            };
        }
    }

    /// Run the daily schedule until `shutdown` is cancelled
    ///
    /// Failed runs are logged and the loop waits for the next scheduled time.
    /// With retention disabled the task exits immediately.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            if !self.enabled {
                tracing::info!("Audit retention purge disabled");
                return;
            }

            tracing::info!(
                retention_days = self.retention_days,
                purge_time = %self.purge_time,
                "Audit retention purge scheduled"
            );

            loop {
                let now = Local::now();
                let next = self.next_run_after(&now);
                let wait = (next.clone() - now).to_std().unwrap_or_default();
                tracing::debug!(next_run = %next, "Waiting for next audit purge");

                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::info!("Audit retention purge stopped");
                        break;
                    }
                    _ = tokio::time::sleep(wait) => {}
                }

                if let Err(e) = self.purge_now().await {
                    tracing::error!(error = %e, "Audit retention purge failed");
                }
            }
        })
    }
}

/// Resolve a wall-clock time, moving forward hour by hour past a DST gap
fn first_valid_local<T>(
    naive: NaiveDateTime,
    resolve: impl Fn(&NaiveDateTime) -> Option<T>,
) -> Option<T> {
    (0..=MAX_GAP_HOURS).find_map(|hours| resolve(&(naive + Duration::hours(hours))))
}
