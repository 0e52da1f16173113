/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Define the closed error taxonomy and the structured error
    value every Syn-Crew-Core failure is normalised into, plus
    the factory used to mint pre-filled errors per kind.

  Security / Safety Notes:
    Structured errors may carry diagnostic details; whether a
    given error is safe to show an operator is decided by the
    policy module, never here.

  Dependencies:
    thiserror for the error derive, chrono for construction
    timestamps, uuid for trace identifiers, serde_json for the
    ordered details payload.

  Operational Scope:
    Used across modules to propagate classified failures and
    to correlate them with log entries via trace identifiers.

  Revision History:
    2025-06-19 COD  Established taxonomy and structured error.
    2025-07-02 COD  Injected trace-id source for deterministic
                    identifiers under test.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Exactly one kind per error, drawn from a closed set
    - Errors immutable once constructed
    - No silent failure paths
============================================================*/

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Result alias for Syn-Crew-Core operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Closed enumeration of failure categories.
///
/// Extending this set requires a matching update to the policy
/// tables in `policy.rs`; the exhaustive matches there will not
/// compile otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    Network,
    Database,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    RateLimit,
    Unknown,
}

impl ErrorKind {
    /// Every kind, in declaration order. Used by exhaustiveness checks.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::Validation,
        ErrorKind::Network,
        ErrorKind::Database,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::RateLimit,
        ErrorKind::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Network => "NETWORK",
            ErrorKind::Database => "DATABASE",
            ErrorKind::Authentication => "AUTHENTICATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::RateLimit => "RATE_LIMIT",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform error value all Syn-Crew-Core failures normalise into.
///
/// Constructed exactly once at the point a failure is classified and
/// never mutated afterwards; the builder methods below consume `self`
/// and are only used during construction.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("[{kind}] {message} (trace {trace_id})")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    pub timestamp: String,
    pub trace_id: String,
}

impl AppError {
    /// Construct an error with the given kind, message, and trace id.
    /// The timestamp is assigned here and never changes.
    pub fn new(kind: ErrorKind, message: impl Into<String>, trace_id: String) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            trace_id,
        }
    }

    /// Attach a machine-readable sub-classifier code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach an ordered diagnostic payload.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Capability producing fresh, globally-unique trace identifiers.
///
/// Injected rather than called ambiently so tests can pin identifiers.
pub trait TraceIdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Default source backed by process-wide random UUID v4 generation.
pub struct UuidTraceIds;

impl TraceIdSource for UuidTraceIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Convenience constructors minting pre-filled errors per taxonomy kind.
#[derive(Clone)]
pub struct ErrorFactory {
    ids: Arc<dyn TraceIdSource>,
}

impl Default for ErrorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorFactory {
    pub fn new() -> Self {
        Self::with_ids(Arc::new(UuidTraceIds))
    }

    pub fn with_ids(ids: Arc<dyn TraceIdSource>) -> Self {
        Self { ids }
    }

    fn trace(&self, supplied: Option<String>) -> String {
        supplied.unwrap_or_else(|| self.ids.next_id())
    }

    pub fn validation(
        &self,
        message: impl Into<String>,
        details: Option<Map<String, Value>>,
        trace_id: Option<String>,
    ) -> AppError {
        let mut err = AppError::new(ErrorKind::Validation, message, self.trace(trace_id))
            .with_code("VALIDATION_ERROR");
        if let Some(details) = details {
            err = err.with_details(details);
        }
        err
    }

    pub fn not_found(&self, resource: &str, trace_id: Option<String>) -> AppError {
        let mut details = Map::new();
        details.insert("resource".into(), Value::String(resource.to_string()));
        AppError::new(
            ErrorKind::NotFound,
            format!("{resource} not found"),
            self.trace(trace_id),
        )
        .with_code("NOT_FOUND")
        .with_details(details)
    }

    pub fn unauthorized(&self, message: Option<&str>, trace_id: Option<String>) -> AppError {
        AppError::new(
            ErrorKind::Authentication,
            message.unwrap_or("Authentication required"),
            self.trace(trace_id),
        )
        .with_code("UNAUTHORIZED")
    }

    pub fn forbidden(&self, message: Option<&str>, trace_id: Option<String>) -> AppError {
        AppError::new(
            ErrorKind::Authorization,
            message.unwrap_or("Access denied"),
            self.trace(trace_id),
        )
        .with_code("FORBIDDEN")
    }

    pub fn conflict(
        &self,
        message: impl Into<String>,
        details: Option<Map<String, Value>>,
        trace_id: Option<String>,
    ) -> AppError {
        let mut err =
            AppError::new(ErrorKind::Conflict, message, self.trace(trace_id)).with_code("CONFLICT");
        if let Some(details) = details {
            err = err.with_details(details);
        }
        err
    }

    pub fn database(
        &self,
        message: impl Into<String>,
        details: Option<Map<String, Value>>,
        trace_id: Option<String>,
    ) -> AppError {
        let mut err = AppError::new(ErrorKind::Database, message, self.trace(trace_id))
            .with_code("DATABASE_ERROR");
        if let Some(details) = details {
            err = err.with_details(details);
        }
        err
    }

    pub fn network(
        &self,
        message: Option<&str>,
        details: Option<Map<String, Value>>,
        trace_id: Option<String>,
    ) -> AppError {
        let mut err = AppError::new(
            ErrorKind::Network,
            message.unwrap_or("Network error occurred"),
            self.trace(trace_id),
        )
        .with_code("NETWORK_ERROR");
        if let Some(details) = details {
            err = err.with_details(details);
        }
        err
    }

    pub fn rate_limit(&self, message: Option<&str>, trace_id: Option<String>) -> AppError {
        AppError::new(
            ErrorKind::RateLimit,
            message.unwrap_or("Rate limit exceeded"),
            self.trace(trace_id),
        )
        .with_code("RATE_LIMIT_EXCEEDED")
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TraceIdSource;

    /// Deterministic trace-id source for tests.
    pub struct FixedIds(pub &'static str);

    impl TraceIdSource for FixedIds {
        fn next_id(&self) -> String {
            self.0.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedIds;
    use super::*;

    #[test]
    fn not_found_fills_message_and_resource_details() {
        let factory = ErrorFactory::new();
        let err = factory.not_found("User", None);
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "User not found");
        assert_eq!(err.code.as_deref(), Some("NOT_FOUND"));
        let details = err.details.expect("details present");
        assert_eq!(details.get("resource"), Some(&Value::String("User".into())));
    }

    #[test]
    fn factory_constructors_use_default_messages() {
        let factory = ErrorFactory::new();
        assert_eq!(
            factory.unauthorized(None, None).message,
            "Authentication required"
        );
        assert_eq!(factory.forbidden(None, None).message, "Access denied");
        assert_eq!(
            factory.network(None, None, None).message,
            "Network error occurred"
        );
        assert_eq!(factory.rate_limit(None, None).message, "Rate limit exceeded");
    }

    #[test]
    fn supplied_trace_id_is_kept_verbatim() {
        let factory = ErrorFactory::new();
        let err = factory.validation("bad input", None, Some("trace-123".into()));
        assert_eq!(err.trace_id, "trace-123");
        let err = factory.database("disk on fire", None, Some("trace-456".into()));
        assert_eq!(err.trace_id, "trace-456");
    }

    #[test]
    fn missing_trace_id_is_generated_from_the_source() {
        let factory = ErrorFactory::with_ids(Arc::new(FixedIds("fixed-id")));
        let err = factory.conflict("duplicate", None, None);
        assert_eq!(err.trace_id, "fixed-id");
    }

    #[test]
    fn fresh_uuid_trace_ids_are_unique() {
        let factory = ErrorFactory::new();
        let a = factory.rate_limit(None, None);
        let b = factory.rate_limit(None, None);
        assert_ne!(a.trace_id, b.trace_id);
    }

    #[test]
    fn timestamp_is_assigned_at_construction() {
        let err = AppError::new(ErrorKind::Unknown, "boom", "t".into());
        assert!(!err.timestamp.is_empty());
        assert!(err.timestamp.ends_with('Z'));
    }

    #[test]
    fn kinds_serialize_in_screaming_snake_case() {
        let json = serde_json::to_value(ErrorKind::RateLimit).expect("serializable");
        assert_eq!(json, Value::String("RATE_LIMIT".into()));
        let json = serde_json::to_value(ErrorKind::NotFound).expect("serializable");
        assert_eq!(json, Value::String("NOT_FOUND".into()));
    }
}
