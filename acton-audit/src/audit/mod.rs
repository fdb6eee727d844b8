//! Declarative auditing of business operations
//!
//! Operations are declared once with an [`AuditDescriptor`] and invoked through
//! an [`AuditInterceptor`], which emits exactly one [`AuditRecord`] per call to
//! the configured [`AuditStorage`] backend. The entity id of each record comes
//! from a small path expression over the call's named arguments and result.
//!
//! # Architecture
//!
//! - [`descriptor`]: per-operation declarations and the registration table
//! - [`interceptor`]: runs the operation and builds the outcome record
//! - [`expression`]: read-only path expressions for entity ids
//! - [`serializer`]: JSON snapshots that never fail
//! - [`storage`]: backend trait with in-memory and PostgreSQL implementations
//! - [`retention`]: daily purge of records past the retention window
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use acton_audit::audit::{
//!     AuditDescriptor, AuditEventType, AuditInterceptor, AuditRegistry, InMemoryAuditStorage,
//! };
//!
//! # async fn example() -> acton_audit::error::Result<()> {
//! #[derive(Debug, serde::Serialize)]
//! struct CreateUser {
//!     name: String,
//! }
//!
//! let storage = Arc::new(InMemoryAuditStorage::new());
//! let interceptor = AuditInterceptor::new(storage.clone(), "users-api");
//!
//! let mut registry = AuditRegistry::new();
//! registry.register(
//!     "users.create",
//!     AuditDescriptor::new(AuditEventType::EntityCreated)
//!         .entity_type("user")
//!         .entity_id("result.id"),
//! )?;
//!
//! let create_user = registry.wrap("users.create", interceptor, |args: CreateUser| async move {
//!     Ok::<_, std::io::Error>(serde_json::json!({ "id": 42, "name": args.name }))
//! })?;
//!
//! create_user.call(CreateUser { name: "ada".into() }).await?;
//! assert_eq!(storage.records()[0].entity_id.as_deref(), Some("42"));
//! # Ok(())
//! # }
//! ```

pub mod arguments;
pub mod descriptor;
pub mod expression;
pub mod interceptor;
pub mod record;
pub mod retention;
pub mod serializer;
pub mod storage;

pub use arguments::Arguments;
pub use descriptor::{AuditDescriptor, AuditRegistry};
pub use expression::{evaluate, EntityIdExpression, ExpressionError, PathExpression};
pub use interceptor::{AuditInterceptor, Audited};
pub use record::{AuditEventType, AuditRecord, AuditStatus};
pub use retention::RetentionPurger;
pub use serializer::{serialize, snapshot};
pub use storage::{AuditStorage, InMemoryAuditStorage};
