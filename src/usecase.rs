/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::usecase
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Roster use-cases: list members, fetch one member, create a
    member. Every failure crossing this boundary is classified
    into exactly one structured error, reported to the sink
    exactly once, then propagated.

  Security / Safety Notes:
    Raw failure text never leaves this layer unclassified; the
    presentation boundary decides what an end user sees.

  Dependencies:
    Crate-internal only; the gateway port keeps transport
    concerns out of this module.

  Operational Scope:
    Called by the CLI boundary; tested against an in-memory
    gateway.

  Revision History:
    2025-06-20 COD  Authored roster use-cases.
    2025-07-02 COD  Special-cased the duplicate signature as a
                    conflict ahead of generic classification.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Classify once, report once, propagate
    - Nothing swallowed, nothing silently retried
    - Known failure signatures disambiguated explicitly
============================================================*/

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::classify::{Classifier, Failure};
use crate::error::{AppError, ErrorFactory, Result};
use crate::logger::ErrorSink;
use crate::schema;
use crate::user::{NewUser, User};

/// Port to the remote roster repository.
pub trait UserGateway {
    /// Fetch every raw member record.
    async fn fetch_all(&self) -> std::result::Result<Vec<Value>, Failure>;
    /// Fetch one raw member record by id.
    async fn fetch_one(&self, id: &str) -> std::result::Result<Value, Failure>;
    /// Submit a new member; returns the created raw record.
    async fn submit(&self, user: &NewUser) -> std::result::Result<Value, Failure>;
}

/// Roster use-cases over an injected gateway and error sink.
pub struct UserService<G: UserGateway> {
    gateway: G,
    classifier: Classifier,
    factory: ErrorFactory,
    sink: Arc<dyn ErrorSink>,
}

impl<G: UserGateway> UserService<G> {
    pub fn new(gateway: G, sink: Arc<dyn ErrorSink>) -> Self {
        Self::with_parts(gateway, Classifier::new(), ErrorFactory::new(), sink)
    }

    pub fn with_parts(
        gateway: G,
        classifier: Classifier,
        factory: ErrorFactory,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            gateway,
            classifier,
            factory,
            sink,
        }
    }

    /// List all roster members, validating each raw record.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        const CONTEXT: &str = "list_users";
        let records = self
            .gateway
            .fetch_all()
            .await
            .map_err(|failure| self.fail(failure, CONTEXT))?;

        let mut users = Vec::with_capacity(records.len());
        for record in &records {
            match schema::validate_user(record) {
                Ok(user) => users.push(user),
                Err(violations) => {
                    return Err(self.fail(Failure::from(violations), CONTEXT));
                }
            }
        }
        Ok(users)
    }

    /// Fetch a single roster member by id.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        const CONTEXT: &str = "get_user";
        if !is_valid_id(id) {
            let error = self
                .factory
                .validation("User id must be a positive integer", None, None);
            return Err(self.emit(error, CONTEXT));
        }
        let record = self
            .gateway
            .fetch_one(id)
            .await
            .map_err(|failure| self.fail(failure, CONTEXT))?;
        schema::validate_user(&record)
            .map_err(|violations| self.fail(Failure::from(violations), CONTEXT))
    }

    /// Create a roster member from validated input.
    pub async fn create_user(&self, input: NewUser) -> Result<User> {
        const CONTEXT: &str = "create_user";
        if let Err(violations) = schema::validate_new_user(&input) {
            return Err(self.fail(Failure::from(violations), CONTEXT));
        }

        let record = match self.gateway.submit(&input).await {
            Ok(record) => record,
            Err(failure) => {
                // Known duplicate signature is disambiguated before the
                // generic classifier sees it.
                if let Some(conflict) = duplicate_conflict(&self.factory, &failure, &input) {
                    return Err(self.emit(conflict, CONTEXT));
                }
                return Err(self.fail(failure, CONTEXT));
            }
        };

        schema::validate_user(&record)
            .map_err(|violations| self.fail(Failure::from(violations), CONTEXT))
    }

    // Terminal classification: classify, report once, hand back.
    fn fail(&self, failure: Failure, context: &str) -> AppError {
        let error = self.classifier.classify(failure, Some(context), None);
        self.sink.report(&error, Some(context));
        error
    }

    // Same reporting discipline for errors minted via the factory.
    fn emit(&self, error: AppError, context: &str) -> AppError {
        self.sink.report(&error, Some(context));
        error
    }
}

fn is_valid_id(id: &str) -> bool {
    matches!(id.parse::<u64>(), Ok(parsed) if parsed > 0)
}

fn duplicate_conflict(
    factory: &ErrorFactory,
    failure: &Failure,
    input: &NewUser,
) -> Option<AppError> {
    let Failure::Generic { message } = failure else {
        return None;
    };
    let lowered = message.to_lowercase();
    if !lowered.contains("already exists") && !lowered.contains("http 409") {
        return None;
    }
    let mut details = Map::new();
    details.insert("email".into(), Value::String(input.email.clone()));
    Some(factory.conflict("User already exists", Some(details), None))
}
