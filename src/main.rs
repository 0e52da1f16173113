/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Crew Core. Drives the roster use-cases
    (list, show, create) against the remote roster API and
    renders results or policy-screened failures.

  Security / Safety Notes:
    Failure rendering follows the user-facing policy: internal
    kinds surface only the generic fallback plus the trace
    identifier, never raw messages or details.

  Dependencies:
    clap for CLI parsing, chrono for session stamps.

  Operational Scope:
    Invoked by operators directly or by the Syn-Crew
    orchestration layer.

  Revision History:
    2025-06-20 COD  Authored Syn-Crew Core runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Policy-screened operator output
============================================================*/

mod api;
mod classify;
mod config;
mod error;
mod logger;
mod policy;
mod schema;
mod usecase;
mod user;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};

use api::RosterApiClient;
use classify::{Classifier, Failure};
use config::CrewConfig;
use error::{AppError, ErrorKind, Result};
use logger::{ErrorSink, Logger};
use usecase::{UserGateway, UserService};
use user::{NewUser, User};

/// Command-line arguments for Syn-Crew-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Crew-Core",
    version,
    author = "Synavera Systems",
    about = "Clean-architecture roster client for Syn-Crew"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
    /// Emit results as pretty-printed JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all roster members.
    List,
    /// Show a single roster member by id.
    Show { id: String },
    /// Create a roster member.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            render_failure(&err);
            err.kind.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = CrewConfig::load_from_optional_path(cli.config.as_deref())?;

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .or_else(|| Some(config.log_dir().join(format!("core_{session_stamp}.log"))));
    let logger = Arc::new(Logger::new(log_path, cli.verbose)?);
    logger.info("INIT", "Syn-Crew Core awakening.");

    let client = RosterApiClient::new(&config.api)?;
    let sink: Arc<dyn ErrorSink> = logger.clone();
    let service = UserService::new(client, sink);

    let outcome = dispatch(&cli, &service).await;
    match &outcome {
        Ok(()) => logger.info("COMPLETE", "Roster operation finished."),
        Err(err) => logger.warn("FAILED", format!("Operation failed with kind {}", err.kind)),
    }
    logger.finalize()?;

    outcome.map(|()| ExitCode::SUCCESS)
}

async fn dispatch<G: UserGateway>(cli: &Cli, service: &UserService<G>) -> Result<()> {
    match &cli.command {
        Command::List => {
            let users = service.list_users().await?;
            render_users(&users, cli.json)
        }
        Command::Show { id } => {
            let user = service.get_user(id).await?;
            render_users(std::slice::from_ref(&user), cli.json)
        }
        Command::Create { name, email } => {
            let user = service
                .create_user(NewUser::new(name.clone(), email.clone()))
                .await?;
            if cli.json {
                render_users(std::slice::from_ref(&user), true)
            } else {
                println!("→ Created {} <{}> (id {})", user.name, user.email, user.id);
                Ok(())
            }
        }
    }
}

fn render_users(users: &[User], json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(users).map_err(|err| {
            Classifier::new().classify(
                Failure::generic(format!("Failed to encode output: {err}")),
                Some("render"),
                None,
            )
        })?;
        println!("{rendered}");
    } else {
        for user in users {
            println!("{:<6} {:<24} {}", user.id, user.name, user.email);
        }
    }
    Ok(())
}

/// Presentation policy: user-facing kinds show their friendly message
/// and code; everything else shows the generic fallback plus the trace
/// identifier for log correlation.
fn render_failure(error: &AppError) {
    if error.kind.is_user_facing() {
        let code = error.code.as_deref().unwrap_or(error.kind.as_str());
        eprintln!("[Syn-Crew-Core] {} ({code})", error.kind.friendly_message());
    } else {
        eprintln!(
            "[Syn-Crew-Core] {} (trace {})",
            ErrorKind::Unknown.friendly_message(),
            error.trace_id
        );
    }
}
