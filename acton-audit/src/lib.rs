//! # acton-audit
//!
//! Declarative audit trail for Rust backend services.
//!
//! ## Features
//!
//! - **Interception**: wrap declared operations and emit exactly one audit record per call
//! - **Entity ids**: resolve `#id` / `result.id` path expressions against arguments and results
//! - **Safe snapshots**: argument and result serialization that never fails the operation
//! - **Correlation**: per-request `x-request-id` token in task-local context, logs and records
//! - **Retention**: daily purge of records older than the configured window
//! - **Storage**: in-memory backend, PostgreSQL with the `database` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use acton_audit::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     let storage: Arc<dyn AuditStorage> = Arc::new(InMemoryAuditStorage::new());
//!
//!     // Purge old records once a day
//!     let shutdown = CancellationToken::new();
//!     let purger = Arc::new(RetentionPurger::new(storage, &config.audit.retention)?);
//!     let purge_task = purger.spawn(shutdown.clone());
//!
//!     let app = with_correlation(
//!         Router::new().route("/health", get(|| async { "ok" })),
//!         &config.audit.correlation,
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     shutdown.cancel();
//!     let _ = purge_task.await;
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::audit::{
        Arguments, AuditDescriptor, AuditEventType, AuditInterceptor, AuditRecord, AuditRegistry,
        AuditStatus, AuditStorage, Audited, InMemoryAuditStorage, RetentionPurger,
    };

    #[cfg(feature = "database")]
    pub use crate::audit::storage::pg::PgAuditStorage;

    pub use crate::config::{AuditConfig, Config, CorrelationConfig, RetentionConfig};
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{with_correlation, CorrelationId};
    pub use crate::observability::init_tracing;

    pub use axum::{
        routing::{get, post},
        Router,
    };
    pub use tokio_util::sync::CancellationToken;
}
