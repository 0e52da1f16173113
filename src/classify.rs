/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::classify
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Normalise every recognised failure shape into a structured
    AppError. The recognised shapes form a closed variant set;
    new shapes are added here explicitly, never inferred.

  Security / Safety Notes:
    Original failure text is retained inside `details` only;
    whether it reaches an end user is the policy module's call.

  Dependencies:
    serde_json for diagnostic payloads.

  Operational Scope:
    Called by use-cases on every failure crossing their
    boundary. Classification is total: every input yields a
    structured error, never a panic.

  Revision History:
    2025-06-20 COD  Authored the five-step classifier.
    2025-07-02 COD  Distinguished transport timeouts with a
                    dedicated code.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Fixed precedence order, first match wins
    - Idempotent pass-through for classified input
    - Substring cues confined to the generic branch
============================================================*/

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{AppError, ErrorKind, TraceIdSource, UuidTraceIds};
use crate::schema::SchemaViolations;

/// Closed set of failure shapes the classifier recognises.
///
/// Precedence follows declaration order: already-classified errors pass
/// through untouched, schema violations outrank transport faults, and
/// the substring heuristic applies only to generic textual failures.
#[derive(Debug)]
pub enum Failure {
    /// A failure that already went through classification.
    Classified(AppError),
    /// A schema validation failure with ordered field issues.
    Validation(SchemaViolations),
    /// The transport call itself could not complete (DNS, connection
    /// refused, timeout), as opposed to an HTTP error status.
    Transport { message: String, timed_out: bool },
    /// A generic error value carrying a textual message.
    Generic { message: String },
    /// Anything else, stringified at the point of capture.
    Opaque { value: String },
}

impl Failure {
    pub fn generic(message: impl Into<String>) -> Self {
        Failure::Generic {
            message: message.into(),
        }
    }

    /// Capture a non-error value by stringifying it.
    pub fn opaque(value: impl std::fmt::Debug) -> Self {
        Failure::Opaque {
            value: format!("{value:?}"),
        }
    }
}

impl From<AppError> for Failure {
    fn from(error: AppError) -> Self {
        Failure::Classified(error)
    }
}

impl From<SchemaViolations> for Failure {
    fn from(violations: SchemaViolations) -> Self {
        Failure::Validation(violations)
    }
}

/// Normalises failures into [`AppError`] values.
#[derive(Clone)]
pub struct Classifier {
    ids: Arc<dyn TraceIdSource>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::with_ids(Arc::new(UuidTraceIds))
    }

    pub fn with_ids(ids: Arc<dyn TraceIdSource>) -> Self {
        Self { ids }
    }

    /// Classify a failure into a structured error. Total over the
    /// `Failure` set; never fails itself.
    ///
    /// The supplied `trace_id` is kept verbatim when present; a fresh
    /// identifier is minted otherwise. Both `context` and `trace_id`
    /// are ignored for already-classified input.
    pub fn classify(
        &self,
        failure: Failure,
        context: Option<&str>,
        trace_id: Option<String>,
    ) -> AppError {
        match failure {
            Failure::Classified(error) => error,
            Failure::Validation(violations) => {
                let mut details = Map::new();
                details.insert(
                    "issues".into(),
                    serde_json::to_value(&violations.issues).unwrap_or(Value::Null),
                );
                details.insert(
                    "invalidFields".into(),
                    Value::from(violations.issues.len()),
                );
                insert_context(&mut details, context);
                AppError::new(
                    ErrorKind::Validation,
                    violations.summary(),
                    self.trace(trace_id),
                )
                .with_code("VALIDATION_FAILED")
                .with_details(details)
            }
            Failure::Transport { message, timed_out } => {
                let mut details = Map::new();
                details.insert("originalMessage".into(), Value::String(message));
                insert_context(&mut details, context);
                let code = if timed_out {
                    "NETWORK_TIMEOUT"
                } else {
                    "NETWORK_REQUEST_FAILED"
                };
                AppError::new(
                    ErrorKind::Network,
                    "Network request failed",
                    self.trace(trace_id),
                )
                .with_code(code)
                .with_details(details)
            }
            Failure::Generic { message } => {
                // Known weakness: free-text cues can misfire when a
                // message merely mentions one of the substrings.
                let lowered = message.to_lowercase();
                let (kind, code, shown) = if lowered.contains("unauthorized") {
                    (
                        ErrorKind::Authentication,
                        "UNAUTHORIZED",
                        "Authentication failed".to_string(),
                    )
                } else if lowered.contains("forbidden") {
                    (
                        ErrorKind::Authorization,
                        "FORBIDDEN",
                        "Access denied".to_string(),
                    )
                } else if lowered.contains("not found") {
                    (
                        ErrorKind::NotFound,
                        "NOT_FOUND",
                        "Resource not found".to_string(),
                    )
                } else {
                    (ErrorKind::Unknown, "GENERIC_ERROR", message.clone())
                };
                let mut details = Map::new();
                details.insert("originalMessage".into(), Value::String(message));
                insert_context(&mut details, context);
                AppError::new(kind, shown, self.trace(trace_id))
                    .with_code(code)
                    .with_details(details)
            }
            Failure::Opaque { value } => {
                let mut details = Map::new();
                details.insert("value".into(), Value::String(value));
                insert_context(&mut details, context);
                AppError::new(
                    ErrorKind::Unknown,
                    "An unknown error occurred",
                    self.trace(trace_id),
                )
                .with_code("UNKNOWN_ERROR")
                .with_details(details)
            }
        }
    }

    fn trace(&self, supplied: Option<String>) -> String {
        supplied.unwrap_or_else(|| self.ids.next_id())
    }
}

fn insert_context(details: &mut Map<String, Value>, context: Option<&str>) {
    if let Some(context) = context {
        details.insert("context".into(), Value::String(context.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::testing::FixedIds;
    use crate::error::ErrorFactory;
    use crate::schema::{FieldIssue, SchemaViolations};

    fn classifier() -> Classifier {
        Classifier::with_ids(Arc::new(FixedIds("test-trace")))
    }

    fn two_issue_violations() -> SchemaViolations {
        SchemaViolations::new(vec![
            FieldIssue {
                path: "email".into(),
                message: "must be a valid email address".into(),
            },
            FieldIssue {
                path: "name".into(),
                message: "must be a non-empty string".into(),
            },
        ])
    }

    #[test]
    fn classified_input_passes_through_unchanged() {
        let original = ErrorFactory::new().not_found("User", Some("keep-me".into()));
        let reclassified = classifier().classify(
            Failure::from(original.clone()),
            Some("ignored"),
            Some("also-ignored".into()),
        );
        assert_eq!(reclassified, original);
    }

    #[test]
    fn schema_violations_classify_as_validation() {
        let err = classifier().classify(
            Failure::from(two_issue_violations()),
            Some("create_user"),
            None,
        );
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.code.as_deref(), Some("VALIDATION_FAILED"));
        let details = err.details.expect("details present");
        assert_eq!(details.get("invalidFields"), Some(&Value::from(2)));
        assert_eq!(
            details.get("context"),
            Some(&Value::String("create_user".into()))
        );
        assert!(err.message.contains("email"));
        assert!(err.message.contains("name"));
    }

    #[test]
    fn validation_outranks_substring_cues_in_issue_text() {
        let violations = SchemaViolations::new(vec![FieldIssue {
            path: "team".into(),
            message: "referenced team was not found in the roster".into(),
        }]);
        let err = classifier().classify(Failure::from(violations), None, None);
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn transport_faults_classify_as_network() {
        let err = classifier().classify(
            Failure::Transport {
                message: "connection refused".into(),
                timed_out: false,
            },
            Some("list_users"),
            None,
        );
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.code.as_deref(), Some("NETWORK_REQUEST_FAILED"));
        assert_eq!(err.message, "Network request failed");
    }

    #[test]
    fn transport_timeouts_carry_a_distinguishing_code() {
        let err = classifier().classify(
            Failure::Transport {
                message: "operation timed out".into(),
                timed_out: true,
            },
            None,
            None,
        );
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.code.as_deref(), Some("NETWORK_TIMEOUT"));
    }

    #[test]
    fn not_found_cue_maps_generic_failures() {
        let err = classifier().classify(Failure::generic("User not found"), None, None);
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(err.message, "Resource not found");
        let details = err.details.expect("details present");
        assert_eq!(
            details.get("originalMessage"),
            Some(&Value::String("User not found".into()))
        );
    }

    #[test]
    fn unauthorized_and_forbidden_cues_map_to_auth_kinds() {
        let err = classifier().classify(Failure::generic("401 Unauthorized"), None, None);
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Authentication failed");

        let err = classifier().classify(Failure::generic("HTTP 403 Forbidden"), None, None);
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "Access denied");
    }

    #[test]
    fn uncued_generic_failures_keep_their_message_verbatim() {
        let err = classifier().classify(
            Failure::generic("Database connection failed"),
            None,
            None,
        );
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.code.as_deref(), Some("GENERIC_ERROR"));
        assert_eq!(err.message, "Database connection failed");
    }

    #[test]
    fn opaque_values_always_classify() {
        let err = classifier().classify(Failure::opaque(42), Some("list_users"), None);
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.code.as_deref(), Some("UNKNOWN_ERROR"));
        assert_eq!(err.message, "An unknown error occurred");
        let details = err.details.expect("details present");
        assert_eq!(details.get("value"), Some(&Value::String("42".into())));
    }

    #[test]
    fn supplied_trace_id_propagates_through_every_branch() {
        let c = classifier();
        let trace = || Some("pinned-trace".to_string());
        for failure in [
            Failure::from(two_issue_violations()),
            Failure::Transport {
                message: "dns failure".into(),
                timed_out: false,
            },
            Failure::generic("boom"),
            Failure::opaque("???"),
        ] {
            let err = c.classify(failure, None, trace());
            assert_eq!(err.trace_id, "pinned-trace");
        }
    }

    #[test]
    fn missing_trace_id_is_minted_from_the_source() {
        let err = classifier().classify(Failure::generic("boom"), None, None);
        assert_eq!(err.trace_id, "test-trace");
    }
}
