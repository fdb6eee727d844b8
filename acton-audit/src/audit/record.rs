//! Audit record types
//!
//! One [`AuditRecord`] is produced for every intercepted invocation. The record
//! is built inside the interceptor and handed by value to the storage backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single audit trail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// When the record was created (used by retention purging)
    pub created_at: DateTime<Utc>,
    /// Domain event kind
    pub event_type: AuditEventType,
    /// Free-form entity label, may be empty
    pub entity_type: String,
    /// Resolved entity identifier
    pub entity_id: Option<String>,
    /// Outcome of the invocation
    pub status: AuditStatus,
    /// Serialized argument/result/failure snapshot
    pub details: Option<String>,
    /// Failure message, set only for [`AuditStatus::Failure`]
    pub error_message: Option<String>,
    /// Wall time spent in the audited operation
    pub duration_ms: u64,
    /// Correlation token active when the record was built
    pub request_id: Option<String>,
    /// Name of the service that generated this record
    pub service_name: String,
}

impl AuditRecord {
    /// Create a new record with the given event type and outcome
    pub fn new(event_type: AuditEventType, status: AuditStatus, service_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            event_type,
            entity_type: String::new(),
            entity_id: None,
            status,
            details: None,
            error_message: None,
            duration_ms: 0,
            request_id: None,
            service_name,
        }
    }

    /// Set the entity label and resolved identifier
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: Option<String>,
    ) -> Self {
        self.entity_type = entity_type.into();
        self.entity_id = entity_id;
        self
    }

    /// Set the serialized details payload
    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    /// Set the failure message
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set the measured duration
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the correlation token
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Override the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Outcome of an audited invocation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    /// The operation returned normally
    Success,
    /// The operation failed or panicked
    Failure,
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Domain event kinds
///
/// The set is open: anything not covered by a named variant goes in
/// [`AuditEventType::Custom`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AuditEventType {
    /// An entity was created
    EntityCreated,
    /// An entity was updated
    EntityUpdated,
    /// An entity was deleted
    EntityDeleted,
    /// An entity was read or exported
    EntityAccessed,
    /// Successful or failed login
    AuthLogin,
    /// User logout
    AuthLogout,
    /// Roles or permissions changed
    PermissionChanged,
    /// Runtime configuration changed
    ConfigurationChanged,
    /// Bulk data export
    DataExported,
    /// Application-defined event
    Custom(String),
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntityCreated => write!(f, "entity.created"),
            Self::EntityUpdated => write!(f, "entity.updated"),
            Self::EntityDeleted => write!(f, "entity.deleted"),
            Self::EntityAccessed => write!(f, "entity.accessed"),
            Self::AuthLogin => write!(f, "auth.login"),
            Self::AuthLogout => write!(f, "auth.logout"),
            Self::PermissionChanged => write!(f, "permission.changed"),
            Self::ConfigurationChanged => write!(f, "configuration.changed"),
            Self::DataExported => write!(f, "data.exported"),
            Self::Custom(name) => write!(f, "custom.{}", name),
        }
    }
}
