//! Audit interception for declared operations
//!
//! [`AuditInterceptor`] runs one operation and emits exactly one
//! [`AuditRecord`] for it:
//!
//! 1. resolve the entity id from the arguments and snapshot them if requested
//! 2. run the operation once, catching failures and panics
//! 3. on success, re-resolve the entity id with the result bound
//! 4. build the SUCCESS or FAILURE record and append it to storage
//! 5. hand the operation's own outcome back untouched (or resume its panic)
//!
//! A storage failure while recording a failed operation is only logged, so it
//! can never hide the operation's error. For successful operations the caller
//! picks the policy: [`AuditInterceptor::intercept`] logs and continues,
//! [`AuditInterceptor::intercept_strict`] reports the storage failure as the
//! call's error.

use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use super::arguments::Arguments;
use super::descriptor::AuditDescriptor;
use super::expression::EntityIdExpression;
use super::record::{AuditRecord, AuditStatus};
use super::serializer::{serialize, snapshot};
use super::storage::AuditStorage;
use crate::config::Config;
use crate::error::Error;
use crate::middleware::CorrelationId;

/// `failureKind` recorded when the operation panicked
pub const PANIC_FAILURE_KIND: &str = "panic";

/// Wraps declared operations and emits their audit records
///
/// Holds no per-invocation state; clones share the storage backend.
#[derive(Clone)]
pub struct AuditInterceptor {
    storage: Arc<dyn AuditStorage>,
    service_name: String,
    enabled: bool,
}

impl AuditInterceptor {
    /// Create an interceptor writing to `storage`
    pub fn new(storage: Arc<dyn AuditStorage>, service_name: impl Into<String>) -> Self {
        Self {
            storage,
            service_name: service_name.into(),
            enabled: true,
        }
    }

    /// Create an interceptor from configuration
    ///
    /// With `audit.enabled = false` operations run without producing records.
    pub fn from_config(config: &Config, storage: Arc<dyn AuditStorage>) -> Self {
        Self {
            storage,
            service_name: config.audit_service_name().to_string(),
            enabled: config.audit.enabled,
        }
    }

    /// Service name stamped on records
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Whether records are produced
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `operation` and record its outcome
    ///
    /// The operation's result or error is returned unchanged. Storage failures
    /// are logged at warn level on both paths.
    ///
    /// A FAILURE record's `failureKind` is the short type name of `E` with the
    /// module path and generic parameters removed. Wrapper and boxed errors
    /// therefore report the wrapper: `std::io::Error` records `"Error"` and
    /// `Box<dyn std::error::Error>` records `"Box"`. Use a named error type
    /// when the kind has to identify the failure.
    pub async fn intercept<Fut, T, E>(
        &self,
        descriptor: &AuditDescriptor,
        args: Arguments,
        operation: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Serialize + Debug,
        E: Display,
    {
        let (outcome, emission_error) = self.run(descriptor, args, operation).await;
        if let Some(e) = emission_error {
            tracing::warn!(
                event_type = %descriptor.event_type(),
                error = %e,
                "Failed to emit audit record for successful operation"
            );
        }
        outcome
    }

    /// Run `operation` and record its outcome, failing the call if the
    /// SUCCESS record cannot be stored
    ///
    /// The operation's own error is still returned unchanged, and storage
    /// failures while recording that error are still only logged.
    pub async fn intercept_strict<Fut, T, E>(
        &self,
        descriptor: &AuditDescriptor,
        args: Arguments,
        operation: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        T: Serialize + Debug,
        E: Display + From<Error>,
    {
        match self.run(descriptor, args, operation).await {
            (Ok(_), Some(e)) => Err(E::from(e)),
            (outcome, _) => outcome,
        }
    }

    async fn run<Fut, T, E>(
        &self,
        descriptor: &AuditDescriptor,
        args: Arguments,
        operation: Fut,
    ) -> (Result<T, E>, Option<Error>)
    where
        Fut: Future<Output = Result<T, E>>,
        T: Serialize + Debug,
        E: Display,
    {
        if !self.enabled {
            return (operation.await, None);
        }

        let expression = descriptor.entity_id_expression();
        let pre_entity_id = expression.resolve(&args, None);
        let pre_details = descriptor
            .includes_args()
            .then(|| serialize(&ArgsDetails { args: &args }));
        let request_id = CorrelationId::current().map(|id| id.to_string());

        let started = Instant::now();
        let outcome = AssertUnwindSafe(operation).catch_unwind().await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(Ok(value)) => {
                let result = if descriptor.includes_result() || reads_result(expression) {
                    Some(snapshot(&value))
                } else {
                    None
                };
                let entity_id = expression.resolve(&args, result.as_ref()).or(pre_entity_id);
                let details = if descriptor.includes_result() {
                    Some(serialize(&SuccessDetails {
                        pre: pre_details.as_deref(),
                        result: result.as_ref().unwrap_or(&Value::Null),
                        duration_ms,
                    }))
                } else {
                    pre_details
                };

                let record = self
                    .record(descriptor, AuditStatus::Success, entity_id, duration_ms, request_id)
                    .with_details(details);
                let emission_error = self.emit(record).await.err();
                (Ok(value), emission_error)
            }
            Ok(Err(error)) => {
                let record = self
                    .record(
                        descriptor,
                        AuditStatus::Failure,
                        pre_entity_id,
                        duration_ms,
                        request_id,
                    )
                    .with_details(Some(failure_details(
                        pre_details.as_deref(),
                        failure_kind::<E>(),
                        duration_ms,
                    )))
                    .with_error_message(error.to_string());
                self.emit_for_failure(record).await;
                (Err(error), None)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                let record = self
                    .record(
                        descriptor,
                        AuditStatus::Failure,
                        pre_entity_id,
                        duration_ms,
                        request_id,
                    )
                    .with_details(Some(failure_details(
                        pre_details.as_deref(),
                        PANIC_FAILURE_KIND,
                        duration_ms,
                    )))
                    .with_error_message(message);
                self.emit_for_failure(record).await;
                std::panic::resume_unwind(panic)
            }
        }
    }

    fn record(
        &self,
        descriptor: &AuditDescriptor,
        status: AuditStatus,
        entity_id: Option<String>,
        duration_ms: u64,
        request_id: Option<String>,
    ) -> AuditRecord {
        AuditRecord::new(
            descriptor.event_type().clone(),
            status,
            self.service_name.clone(),
        )
        .with_entity(descriptor.entity_type_label(), entity_id)
        .with_duration_ms(duration_ms)
        .with_request_id(request_id)
    }

    async fn emit(&self, record: AuditRecord) -> Result<(), Error> {
        tracing::debug!(
            event_type = %record.event_type,
            entity_type = %record.entity_type,
            entity_id = ?record.entity_id,
            status = %record.status,
            duration_ms = record.duration_ms,
            "Emitting audit record"
        );
        self.storage.append(record).await
    }

    async fn emit_for_failure(&self, record: AuditRecord) {
        let event_type = record.event_type.clone();
        if let Err(e) = self.emit(record).await {
            tracing::warn!(
                event_type = %event_type,
                error = %e,
                "Failed to emit audit record for failed operation"
            );
        }
    }
}

/// An operation with its audit descriptor applied
///
/// Produced by [`AuditRegistry::wrap`](super::AuditRegistry::wrap). The
/// argument value passed to [`Audited::call`] is snapshotted field by field as
/// the named arguments before the operation runs. The operation is called
/// inside the guarded region, so a panic while building its future is
/// recorded like any other panic.
#[derive(Clone)]
pub struct Audited<F> {
    descriptor: Arc<AuditDescriptor>,
    interceptor: AuditInterceptor,
    operation: F,
}

impl<F> Audited<F> {
    pub(crate) fn new(
        descriptor: Arc<AuditDescriptor>,
        interceptor: AuditInterceptor,
        operation: F,
    ) -> Self {
        Self {
            descriptor,
            interceptor,
            operation,
        }
    }

    /// Descriptor applied to every call
    pub fn descriptor(&self) -> &AuditDescriptor {
        &self.descriptor
    }

    /// Invoke the operation under audit
    pub async fn call<A, Fut, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        A: Serialize + Debug,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize + Debug,
        E: Display,
    {
        let arguments = Arguments::from_serialize(&args);
        self.interceptor
            .intercept(&self.descriptor, arguments, async {
                (self.operation)(args).await
            })
            .await
    }

    /// Invoke the operation under audit with the strict emission policy
    pub async fn call_strict<A, Fut, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        A: Serialize + Debug,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize + Debug,
        E: Display + From<Error>,
    {
        let arguments = Arguments::from_serialize(&args);
        self.interceptor
            .intercept_strict(&self.descriptor, arguments, async {
                (self.operation)(args).await
            })
            .await
    }
}

#[derive(Debug, Serialize)]
struct ArgsDetails<'a> {
    args: &'a Arguments,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessDetails<'a> {
    pre: Option<&'a str>,
    result: &'a Value,
    duration_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureDetails<'a> {
    pre: Option<&'a str>,
    failure_kind: &'a str,
    duration_ms: u64,
}

fn failure_details(pre: Option<&str>, failure_kind: &str, duration_ms: u64) -> String {
    serialize(&FailureDetails {
        pre,
        failure_kind,
        duration_ms,
    })
}

fn reads_result(expression: &EntityIdExpression) -> bool {
    matches!(expression, EntityIdExpression::Path(path) if path.reads_result())
}

/// Short name of the error type, without module path or generic parameters
fn failure_kind<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::record::AuditEventType;
    use crate::audit::storage::InMemoryAuditStorage;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct DbError(String);

    #[derive(Debug, thiserror::Error)]
    enum ServiceError {
        #[error("{0}")]
        Db(DbError),
        #[error("audit: {0}")]
        Audit(#[from] Error),
    }

    /// Storage that rejects every append
    struct RejectingStorage {
        attempts: AtomicUsize,
    }

    impl RejectingStorage {
        fn new() -> Self {
            Self {
                attempts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuditStorage for RejectingStorage {
        async fn append(&self, _record: AuditRecord) -> Result<(), Error> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(Error::Storage("disk full".to_string()))
        }

        async fn purge_before(&self, _cutoff: DateTime<Utc>) -> Result<u64, Error> {
            Ok(0)
        }
    }

    async fn explode() -> Result<(), DbError> {
        panic!("invariant broken")
    }

    fn setup() -> (Arc<InMemoryAuditStorage>, AuditInterceptor) {
        let storage = Arc::new(InMemoryAuditStorage::new());
        let interceptor = AuditInterceptor::new(storage.clone(), "test-service");
        (storage, interceptor)
    }

    fn details(record: &AuditRecord) -> Value {
        serde_json::from_str(record.details.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_success_record_with_result_expression() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated)
            .entity_type("widget")
            .entity_id("result.id");

        let out: Result<Value, DbError> = interceptor
            .intercept(
                &descriptor,
                Arguments::new().with("id", &Option::<u64>::None),
                async { Ok(json!({"id": 42})) },
            )
            .await;

        assert_eq!(out.unwrap(), json!({"id": 42}));
        let records = storage.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.status, AuditStatus::Success);
        assert_eq!(record.entity_type, "widget");
        assert_eq!(record.entity_id.as_deref(), Some("42"));
        assert_eq!(record.service_name, "test-service");
        assert!(record.details.is_none());
        assert!(record.error_message.is_none());
    }

    #[tokio::test]
    async fn test_failure_record_uses_pre_resolution() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityDeleted).entity_id("#id");

        let out: Result<(), DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("id", &7), async {
                Err(DbError("db down".to_string()))
            })
            .await;

        assert_eq!(out.unwrap_err().to_string(), "db down");
        let records = storage.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.status, AuditStatus::Failure);
        assert_eq!(record.entity_id.as_deref(), Some("7"));
        assert_eq!(record.error_message.as_deref(), Some("db down"));

        let details = details(record);
        assert_eq!(details["failureKind"], "DbError");
        assert_eq!(details["pre"], Value::Null);
        assert!(details["durationMs"].is_u64());
    }

    #[tokio::test]
    async fn test_post_resolution_falls_back_to_pre() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityUpdated).entity_id("#id");

        let _: Result<Value, DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("id", "u-1"), async {
                Ok(json!({"ignored": true}))
            })
            .await;

        assert_eq!(storage.records()[0].entity_id.as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn test_null_result_keeps_no_entity_id() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated).entity_id("result.id");

        let _: Result<Option<u32>, DbError> = interceptor
            .intercept(&descriptor, Arguments::new(), async { Ok(None) })
            .await;

        assert_eq!(storage.records()[0].entity_id, None);
    }

    #[tokio::test]
    async fn test_blank_expression_never_sets_entity_id() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated).entity_id("   ");

        let _: Result<Value, DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("id", &1), async {
                Ok(json!({"id": 2}))
            })
            .await;
        let _: Result<Value, DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("id", &1), async {
                Err(DbError("nope".to_string()))
            })
            .await;

        assert!(storage.records().iter().all(|r| r.entity_id.is_none()));
    }

    #[tokio::test]
    async fn test_include_args_and_result_details() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated)
            .include_args(true)
            .include_result(true);

        let _: Result<Value, DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("name", "ada"), async {
                Ok(json!({"id": 42}))
            })
            .await;

        let details = details(&storage.records()[0]);
        assert_eq!(details["result"], json!({"id": 42}));
        assert!(details["durationMs"].is_u64());
        let pre: Value = serde_json::from_str(details["pre"].as_str().unwrap()).unwrap();
        assert_eq!(pre, json!({"args": {"name": "ada"}}));
    }

    #[tokio::test]
    async fn test_include_args_only_details() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityAccessed).include_args(true);

        let _: Result<u8, DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("id", &9), async { Ok(1) })
            .await;

        assert_eq!(details(&storage.records()[0]), json!({"args": {"id": 9}}));
    }

    #[tokio::test]
    async fn test_failure_details_carry_args() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityDeleted).include_args(true);

        let _: Result<(), DbError> = interceptor
            .intercept(&descriptor, Arguments::new().with("id", &3), async {
                Err(DbError("constraint".to_string()))
            })
            .await;

        let details = details(&storage.records()[0]);
        let pre: Value = serde_json::from_str(details["pre"].as_str().unwrap()).unwrap();
        assert_eq!(pre, json!({"args": {"id": 3}}));
        assert_eq!(details["failureKind"], "DbError");
    }

    #[tokio::test]
    async fn test_failure_path_swallows_emission_error() {
        let storage = Arc::new(RejectingStorage::new());
        let interceptor = AuditInterceptor::new(storage.clone(), "test-service");
        let descriptor = AuditDescriptor::new(AuditEventType::EntityDeleted);

        let out: Result<(), ServiceError> = interceptor
            .intercept_strict(&descriptor, Arguments::new(), async {
                Err(ServiceError::Db(DbError("original".to_string())))
            })
            .await;

        assert!(matches!(out, Err(ServiceError::Db(e)) if e.0 == "original"));
        assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_path_emission_error_is_logged_by_default() {
        let storage = Arc::new(RejectingStorage::new());
        let interceptor = AuditInterceptor::new(storage.clone(), "test-service");
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated);

        let out: Result<u32, DbError> = interceptor
            .intercept(&descriptor, Arguments::new(), async { Ok(5) })
            .await;

        assert_eq!(out.unwrap(), 5);
        assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_strict_success_path_reports_emission_error() {
        let storage = Arc::new(RejectingStorage::new());
        let interceptor = AuditInterceptor::new(storage, "test-service");
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated);

        let out: Result<u32, ServiceError> = interceptor
            .intercept_strict(&descriptor, Arguments::new(), async { Ok(5) })
            .await;

        assert!(matches!(out, Err(ServiceError::Audit(Error::Storage(_)))));
    }

    #[tokio::test]
    async fn test_panicking_operation_is_recorded_and_resumed() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityUpdated).entity_id("#id");

        let task = tokio::spawn(async move {
            let _ = interceptor
                .intercept(&descriptor, Arguments::new().with("id", &11), explode())
                .await;
        });

        let join_error = task.await.unwrap_err();
        assert!(join_error.is_panic());

        let records = storage.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AuditStatus::Failure);
        assert_eq!(records[0].entity_id.as_deref(), Some("11"));
        assert_eq!(records[0].error_message.as_deref(), Some("invariant broken"));
        assert_eq!(details(&records[0])["failureKind"], PANIC_FAILURE_KIND);
    }

    #[tokio::test]
    async fn test_request_id_is_taken_from_correlation_scope() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated);

        CorrelationId::from_inbound(Some("req-77"))
            .scope(async {
                let _: Result<u8, DbError> = interceptor
                    .intercept(&descriptor, Arguments::new(), async { Ok(1) })
                    .await;
            })
            .await;
        let _: Result<u8, DbError> = interceptor
            .intercept(&descriptor, Arguments::new(), async { Ok(1) })
            .await;

        let records = storage.records();
        assert_eq!(records[0].request_id.as_deref(), Some("req-77"));
        assert_eq!(records[1].request_id, None);
    }

    #[tokio::test]
    async fn test_disabled_interceptor_emits_nothing() {
        let storage = Arc::new(InMemoryAuditStorage::new());
        let mut config = Config::default();
        config.audit.enabled = false;
        let interceptor = AuditInterceptor::from_config(&config, storage.clone());
        assert!(!interceptor.is_enabled());

        let out: Result<u8, DbError> = interceptor
            .intercept(
                &AuditDescriptor::new(AuditEventType::EntityCreated),
                Arguments::new(),
                async { Ok(3) },
            )
            .await;

        assert_eq!(out.unwrap(), 3);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_operation_runs_exactly_once() {
        let (storage, interceptor) = setup();
        let calls = AtomicUsize::new(0);
        let descriptor = AuditDescriptor::new(AuditEventType::EntityCreated).entity_id("result");

        let _: Result<usize, DbError> = interceptor
            .intercept(&descriptor, Arguments::new(), async {
                Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(storage.records()[0].entity_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_failure_kind_strips_paths_and_generics() {
        assert_eq!(failure_kind::<DbError>(), "DbError");
        assert_eq!(failure_kind::<std::io::Error>(), "Error");
        assert_eq!(failure_kind::<Vec<String>>(), "Vec");
        assert_eq!(failure_kind::<Box<dyn std::error::Error + Send + Sync>>(), "Box");
    }

    #[tokio::test]
    async fn test_boxed_error_records_wrapper_kind() {
        let (storage, interceptor) = setup();
        let descriptor = AuditDescriptor::new(AuditEventType::EntityDeleted);

        let out: Result<(), Box<dyn std::error::Error + Send + Sync>> = interceptor
            .intercept(&descriptor, Arguments::new(), async { Err("gone".into()) })
            .await;

        assert_eq!(out.unwrap_err().to_string(), "gone");
        let record = &storage.records()[0];
        assert_eq!(record.error_message.as_deref(), Some("gone"));
        assert_eq!(details(record)["failureKind"], "Box");
    }

    #[derive(Debug, Serialize)]
    struct Lookup {
        id: u64,
    }

    fn lookup(args: Lookup) -> futures::future::Ready<Result<u64, DbError>> {
        if args.id == 7 {
            panic!("bad input");
        }
        futures::future::ready(Ok(args.id))
    }

    #[tokio::test]
    async fn test_wrapped_operation_panicking_before_its_future_is_recorded() {
        let (storage, interceptor) = setup();
        let mut registry = crate::audit::AuditRegistry::new();
        registry
            .register(
                "widgets.lookup",
                AuditDescriptor::new(AuditEventType::EntityAccessed).entity_id("#id"),
            )
            .unwrap();
        let audited = registry.wrap("widgets.lookup", interceptor, lookup).unwrap();

        let task = tokio::spawn(async move { audited.call(Lookup { id: 7 }).await });
        assert!(task.await.unwrap_err().is_panic());

        let records = storage.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AuditStatus::Failure);
        assert_eq!(records[0].entity_id.as_deref(), Some("7"));
        assert_eq!(records[0].error_message.as_deref(), Some("bad input"));
        assert_eq!(details(&records[0])["failureKind"], PANIC_FAILURE_KIND);
    }
}
