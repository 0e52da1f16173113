/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Structured, append-only logging for Syn-Crew-Core plus the
    ErrorSink seam through which classified failures are
    recorded exactly once.

  Security / Safety Notes:
    The sink records full diagnostic detail; it writes to
    operator-controlled destinations only and must never decide
    what an end user sees.

  Dependencies:
    std::fs::File, std::sync::Mutex, chrono for UTC stamps,
    sha2 for the session integrity digest.

  Operational Scope:
    Used by the CLI boundary for lifecycle events and by
    use-cases (via ErrorSink) for failure reporting.

  Revision History:
    2025-06-19 COD  Established logging module for Syn-Crew.
    2025-07-02 COD  Added ErrorSink with production no-op.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Reporting hooks are side-effect only and never fail
    - Session digests for auditability
============================================================*/

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{AppError, ErrorKind, Result, TraceIdSource, UuidTraceIds};

/// Structured log level for Syn-Crew-Core events.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Pluggable recorder for classified failures.
///
/// Side effect only: implementations must never fail and are never
/// required for correctness. Use-cases call this exactly once per
/// terminal classification.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &AppError, context: Option<&str>);
}

/// Production-classified no-op sink; the seam toward external
/// observability backends.
pub struct NullSink;

impl ErrorSink for NullSink {
    fn report(&self, _error: &AppError, _context: Option<&str>) {}
}

/// Shared logger that emits append-only entries in Synavera format.
pub struct Logger {
    file: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    verbose: bool,
}

impl Logger {
    /// Build a logger that writes to stderr and optionally to a file.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let file = if let Some(ref file_path) = path {
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    log_setup_failure(format!(
                        "Failed to create log directory {}: {err}",
                        parent.display()
                    ))
                })?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)
                .map_err(|err| {
                    log_setup_failure(format!(
                        "Failed to open log file {}: {err}",
                        file_path.display()
                    ))
                })?;
            Some(Mutex::new(BufWriter::new(file)))
        } else {
            None
        };

        Ok(Self {
            file,
            path,
            verbose,
        })
    }

    /// Emit a log entry with the given level, code, and message.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let payload = format!(
            "{timestamp} [{}] [{}] {}",
            level.as_str(),
            code,
            message.as_ref()
        );

        if self.verbose || level == LogLevel::Error || level == LogLevel::Warn {
            eprintln!("{payload}");
        }

        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                if writeln!(guard, "{payload}").is_err() {
                    eprintln!("{timestamp} [ERROR] [LOGGER] Failed to write to log file");
                }
                if guard.flush().is_err() {
                    eprintln!("{timestamp} [WARN] [LOGGER] Failed to flush log writer");
                }
            }
        }
    }

    /// Convenience wrapper for `INFO` level events.
    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    /// Convenience wrapper for `WARN` level events.
    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    /// Convenience wrapper for `DEBUG` level events.
    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Compute and persist a SHA-256 digest of the session log.
    pub fn finalize(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let data = std::fs::read(path).map_err(|err| {
            log_setup_failure(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let digest = hasher.finalize();

        let mut hash_os = path.as_os_str().to_os_string();
        hash_os.push(".hash");
        let hash_path = PathBuf::from(hash_os);
        let mut file = File::create(&hash_path).map_err(|err| {
            log_setup_failure(format!(
                "Failed to create hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        writeln!(
            file,
            "{:x}  {}",
            digest,
            path.file_name().unwrap_or_default().to_string_lossy()
        )
        .map_err(|err| {
            log_setup_failure(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        Ok(())
    }
}

impl ErrorSink for Logger {
    /// Record a classified failure with full diagnostic context.
    fn report(&self, error: &AppError, context: Option<&str>) {
        let details = error
            .details
            .as_ref()
            .and_then(|details| serde_json::to_string(details).ok())
            .unwrap_or_else(|| "{}".to_string());
        let code = error.code.as_deref().unwrap_or("-");
        let context = context.unwrap_or("-");
        self.log(
            LogLevel::Error,
            error.kind.as_str(),
            format!(
                "code={code} message={:?} trace={} at={} context={context} details={details}",
                error.message, error.trace_id, error.timestamp
            ),
        );
        if cfg!(debug_assertions) {
            let backtrace = Backtrace::capture();
            if backtrace.status() == BacktraceStatus::Captured {
                self.debug("BACKTRACE", format!("trace={}\n{backtrace}", error.trace_id));
            }
        }
    }
}

fn log_setup_failure(message: String) -> AppError {
    AppError::new(ErrorKind::Unknown, message, UuidTraceIds.next_id()).with_code("LOG_SETUP_FAILED")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorFactory, ErrorKind};

    #[test]
    fn null_sink_is_a_no_op() {
        let err = ErrorFactory::new().not_found("User", None);
        NullSink.report(&err, Some("anything"));
    }

    #[test]
    fn logger_report_never_fails_without_a_file() {
        let logger = Logger::new(None, false).expect("stderr-only logger");
        let err = ErrorFactory::new().database("backend unavailable", None, None);
        logger.report(&err, Some("list_users"));
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[test]
    fn finalize_writes_a_session_digest() {
        let dir = std::env::temp_dir().join(format!("syncrew-log-{}", std::process::id()));
        let log_path = dir.join("session.log");
        let logger = Logger::new(Some(log_path.clone()), false).expect("file logger");
        logger.info("TEST", "digest fixture");
        logger.finalize().expect("digest written");

        let mut hash_os = log_path.as_os_str().to_os_string();
        hash_os.push(".hash");
        let digest = std::fs::read_to_string(PathBuf::from(hash_os)).expect("hash file");
        assert!(digest.contains("session.log"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
