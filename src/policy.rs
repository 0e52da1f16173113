/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::policy
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Decide, per error kind, what may be shown to an end user
    and how boundaries map kinds to transport status codes and
    process exit codes.

  Security / Safety Notes:
    Internal kinds (NETWORK, DATABASE, UNKNOWN) must never leak
    raw messages or details; callers render only the generic
    fallback plus the trace identifier for those.

  Dependencies:
    None beyond the crate taxonomy.

  Operational Scope:
    Consulted by presentation boundaries; the tables here and
    the ErrorKind enumeration move together.

  Revision History:
    2025-06-19 COD  Authored user-facing policy tables.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Exhaustive matches; no kind without a policy entry
    - Deterministic exit codes for operational tooling
============================================================*/

use std::process::ExitCode;

use crate::error::ErrorKind;

impl ErrorKind {
    /// Whether errors of this kind are safe to surface to an end user.
    pub fn is_user_facing(self) -> bool {
        match self {
            ErrorKind::Validation
            | ErrorKind::NotFound
            | ErrorKind::Authentication
            | ErrorKind::Authorization
            | ErrorKind::Conflict
            | ErrorKind::RateLimit => true,
            ErrorKind::Network | ErrorKind::Database | ErrorKind::Unknown => false,
        }
    }

    /// Fixed, non-technical sentence shown for this kind.
    pub fn friendly_message(self) -> &'static str {
        match self {
            ErrorKind::Validation => "Please check your input data and try again.",
            ErrorKind::NotFound => "The requested resource was not found.",
            ErrorKind::Authentication => "Please log in to continue.",
            ErrorKind::Authorization => "You don't have permission to perform this action.",
            ErrorKind::Network => "Network error. Please check your connection and try again.",
            ErrorKind::RateLimit => "Too many requests. Please wait and try again.",
            ErrorKind::Conflict => "There was a conflict with your request. Please try again.",
            ErrorKind::Database => "A database error occurred. Please try again later.",
            ErrorKind::Unknown => "An unexpected error occurred. Please try again later.",
        }
    }

    /// HTTP status an HTTP-facing boundary assigns to this kind.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Authentication => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::RateLimit => 429,
            ErrorKind::Network | ErrorKind::Database | ErrorKind::Unknown => 500,
        }
    }

    /// Map the kind to a deterministic process exit code for the CLI.
    pub fn exit_code(self) -> ExitCode {
        match self {
            ErrorKind::Validation => ExitCode::from(20),
            ErrorKind::Authentication => ExitCode::from(21),
            ErrorKind::Authorization => ExitCode::from(22),
            ErrorKind::NotFound => ExitCode::from(23),
            ErrorKind::Conflict => ExitCode::from(24),
            ErrorKind::RateLimit => ExitCode::from(25),
            ErrorKind::Network => ExitCode::from(30),
            ErrorKind::Database => ExitCode::from(40),
            ErrorKind::Unknown => ExitCode::from(50),
        }
    }
}
