//! Per-operation audit declarations and the registration table
//!
//! Operations are audited by registering an [`AuditDescriptor`] under an
//! operation identifier, then wrapping the operation with
//! [`AuditRegistry::wrap`]. The descriptor is fixed once registered.

use std::collections::HashMap;
use std::sync::Arc;

use super::expression::EntityIdExpression;
use super::interceptor::{AuditInterceptor, Audited};
use super::record::AuditEventType;
use crate::error::{Error, Result};

/// Static audit declaration for one operation
///
/// # Example
///
/// ```rust
/// use acton_audit::audit::{AuditDescriptor, AuditEventType};
///
/// let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated)
///     .entity_type("user")
///     .entity_id("result.id")
///     .include_args(true);
///
/// assert_eq!(descriptor.entity_type_label(), "user");
/// assert!(descriptor.includes_args());
/// assert!(!descriptor.includes_result());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDescriptor {
    event_type: AuditEventType,
    entity_type: String,
    entity_id: EntityIdExpression,
    include_args: bool,
    include_result: bool,
}

impl AuditDescriptor {
    /// Declare an audited operation of the given event type
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_type,
            entity_type: String::new(),
            entity_id: EntityIdExpression::Empty,
            include_args: false,
            include_result: false,
        }
    }

    /// Set the entity label
    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    /// Set the entity id expression; it is parsed here, once
    pub fn entity_id(mut self, expression: &str) -> Self {
        self.entity_id = EntityIdExpression::compile(expression);
        if let EntityIdExpression::Invalid { source, error } = &self.entity_id {
            tracing::warn!(
                event_type = %self.event_type,
                expression = %source,
                error = %error,
                "Entity id expression is malformed; records will carry no entity id"
            );
        }
        self
    }

    /// Capture call arguments in record details
    pub fn include_args(mut self, include: bool) -> Self {
        self.include_args = include;
        self
    }

    /// Capture the returned value in record details
    pub fn include_result(mut self, include: bool) -> Self {
        self.include_result = include;
        self
    }

    /// Event kind recorded for this operation
    pub fn event_type(&self) -> &AuditEventType {
        &self.event_type
    }

    /// Entity label recorded for this operation
    pub fn entity_type_label(&self) -> &str {
        &self.entity_type
    }

    /// Compiled entity id expression
    pub fn entity_id_expression(&self) -> &EntityIdExpression {
        &self.entity_id
    }

    /// Whether call arguments are captured
    pub fn includes_args(&self) -> bool {
        self.include_args
    }

    /// Whether the returned value is captured
    pub fn includes_result(&self) -> bool {
        self.include_result
    }
}

/// Registration table mapping operation identifiers to their descriptors
#[derive(Debug, Clone, Default)]
pub struct AuditRegistry {
    operations: HashMap<String, Arc<AuditDescriptor>>,
}

impl AuditRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; each operation may be registered once
    pub fn register(
        &mut self,
        operation: impl Into<String>,
        descriptor: AuditDescriptor,
    ) -> Result<Arc<AuditDescriptor>> {
        let operation = operation.into();
        if self.operations.contains_key(&operation) {
            return Err(Error::DuplicateOperation(operation));
        }
        let descriptor = Arc::new(descriptor);
        tracing::debug!(
            operation = %operation,
            event_type = %descriptor.event_type(),
            "Registered audited operation"
        );
        self.operations.insert(operation, descriptor.clone());
        Ok(descriptor)
    }

    /// Look up the descriptor for an operation
    pub fn descriptor(&self, operation: &str) -> Option<Arc<AuditDescriptor>> {
        self.operations.get(operation).cloned()
    }

    /// Apply the interceptor to `operation`, using its registered descriptor
    pub fn wrap<F>(
        &self,
        operation: &str,
        interceptor: AuditInterceptor,
        f: F,
    ) -> Result<Audited<F>> {
        let descriptor = self
            .descriptor(operation)
            .ok_or_else(|| Error::UnknownOperation(operation.to_string()))?;
        Ok(Audited::new(descriptor, interceptor, f))
    }

    /// Registered operation identifiers
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
