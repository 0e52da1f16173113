/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::schema
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Validate raw roster records fetched from the remote API
    into User entities, collecting every field-level issue in
    field order rather than stopping at the first.

  Security / Safety Notes:
    Issue messages describe the expected shape only; raw field
    values are not echoed back into messages.

  Dependencies:
    serde_json for untyped record inspection.

  Operational Scope:
    Consumed by use-cases before any raw record crosses into
    the entity layer. Violations feed the error classifier.

  Revision History:
    2025-06-19 COD  Authored roster record validation.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Structured parsing with explicit failure modes
    - All issues reported, ordered, with stable field paths
============================================================*/

use serde::Serialize;
use serde_json::Value;

use crate::user::{NewUser, User};

/// One field-level validation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    fn new(path: &str, message: &str) -> Self {
        Self {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

/// Ordered collection of issues produced by a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolations {
    pub issues: Vec<FieldIssue>,
}

impl SchemaViolations {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Human-readable summary joining each issue's path and message.
    pub fn summary(&self) -> String {
        let joined: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.path, issue.message))
            .collect();
        format!("Validation failed: {}", joined.join(", "))
    }
}

/// Validate a raw remote record into a [`User`].
///
/// The remote shape is `{id: number, firstName: string, email: string}`;
/// the validated entity carries `id` as a string.
pub fn validate_user(raw: &Value) -> std::result::Result<User, SchemaViolations> {
    let mut issues = Vec::new();

    let id = match raw.get("id").and_then(Value::as_u64) {
        Some(id) if id > 0 => Some(id),
        _ => {
            issues.push(FieldIssue::new("id", "must be a positive integer"));
            None
        }
    };

    let name = match raw.get("firstName").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => Some(name.trim().to_string()),
        _ => {
            issues.push(FieldIssue::new("firstName", "must be a non-empty string"));
            None
        }
    };

    let email = match raw.get("email").and_then(Value::as_str) {
        Some(email) if plausible_email(email) => Some(email.to_string()),
        _ => {
            issues.push(FieldIssue::new("email", "must be a valid email address"));
            None
        }
    };

    match (id, name, email) {
        (Some(id), Some(name), Some(email)) => Ok(User::new(id.to_string(), name, email)),
        _ => Err(SchemaViolations::new(issues)),
    }
}

/// Validate operator-supplied input before submission.
pub fn validate_new_user(input: &NewUser) -> std::result::Result<(), SchemaViolations> {
    let mut issues = Vec::new();

    if input.name.trim().is_empty() {
        issues.push(FieldIssue::new("name", "must be a non-empty string"));
    }
    if !plausible_email(&input.email) {
        issues.push(FieldIssue::new("email", "must be a valid email address"));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaViolations::new(issues))
    }
}

// Syntactic plausibility only; deliverability is the remote API's concern.
fn plausible_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}
