/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::api
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    HTTP adapter for the remote roster API: list members,
    fetch a single member, submit a new member.

  Security / Safety Notes:
    Performs HTTPS requests to the configured endpoint only.
    No credentials are transmitted.

  Dependencies:
    reqwest for HTTP, serde_json for payload handling.

  Operational Scope:
    Implements the UserGateway port consumed by use-cases.
    Failures surface as raw Failure shapes; classification is
    the caller's responsibility. No retries are performed.

  Revision History:
    2025-06-20 COD  Implemented asynchronous roster client.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Configurable timeouts; a stuck call fails, never hangs
    - Structured response parsing with explicit error paths
    - Transport faults kept distinct from HTTP error statuses
============================================================*/

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::classify::Failure;
use crate::config::ApiConfig;
use crate::error::{ErrorFactory, Result};
use crate::usecase::UserGateway;
use crate::user::NewUser;

/// Client for the remote roster API.
#[derive(Clone)]
pub struct RosterApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl RosterApiClient {
    /// Construct a new client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| {
                ErrorFactory::new().network(
                    Some(&format!("Failed to build HTTP client: {err}")),
                    None,
                    None,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, resource: &str) -> std::result::Result<Value, Failure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_failure)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(resource, status));
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| Failure::generic(format!("Failed to decode {resource} payload: {err}")))
    }
}

impl UserGateway for RosterApiClient {
    async fn fetch_all(&self) -> std::result::Result<Vec<Value>, Failure> {
        let url = format!("{}/users", self.base_url);
        let payload = self.get_json(&url, "Roster").await?;
        match payload.get("users").and_then(Value::as_array) {
            Some(users) => Ok(users.clone()),
            None => Err(Failure::generic(
                "Roster payload is missing the `users` collection",
            )),
        }
    }

    async fn fetch_one(&self, id: &str) -> std::result::Result<Value, Failure> {
        let url = format!("{}/users/{id}", self.base_url);
        self.get_json(&url, "User").await
    }

    async fn submit(&self, user: &NewUser) -> std::result::Result<Value, Failure> {
        let url = format!("{}/users/add", self.base_url);
        let body = json!({
            "firstName": user.name,
            "email": user.email,
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_failure("User submission", status));
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| Failure::generic(format!("Failed to decode created user: {err}")))
    }
}

// Transport-level faults (DNS, refused connection, timeout) map to the
// transport failure shape; everything else stays generic.
fn transport_failure(err: reqwest::Error) -> Failure {
    let timed_out = err.is_timeout();
    if timed_out || err.is_connect() || err.is_request() {
        Failure::Transport {
            message: err.to_string(),
            timed_out,
        }
    } else {
        Failure::generic(err.to_string())
    }
}

// HTTP error statuses become generic failures whose message embeds the
// reason phrase; the classifier's cue heuristic maps them from there.
fn status_failure(resource: &str, status: StatusCode) -> Failure {
    let reason = status.canonical_reason().unwrap_or("request failed");
    Failure::generic(format!("{resource}: HTTP {} {reason}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_stored_without_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://roster.synavera.test/".into(),
            ..ApiConfig::default()
        };
        let client = RosterApiClient::new(&config).expect("client builds");
        assert_eq!(client.base_url, "https://roster.synavera.test");
    }

    #[test]
    fn error_statuses_embed_the_reason_phrase() {
        let failure = status_failure("User", StatusCode::NOT_FOUND);
        match failure {
            Failure::Generic { message } => {
                assert_eq!(message, "User: HTTP 404 Not Found");
            }
            other => panic!("expected generic failure, got {other:?}"),
        }
    }

    #[test]
    fn conflict_statuses_carry_the_known_duplicate_marker() {
        let failure = status_failure("User submission", StatusCode::CONFLICT);
        match failure {
            Failure::Generic { message } => {
                assert!(message.contains("HTTP 409"));
            }
            other => panic!("expected generic failure, got {other:?}"),
        }
    }
}
