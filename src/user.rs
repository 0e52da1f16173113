/*============================================================
  Synavera Project: Syn-Crew
  Module: syncrew_core::user
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared entity types for the user roster: the validated
    User record and the NewUser submission payload.

  Security / Safety Notes:
    Pure data containers; no I/O performed in this module.

  Dependencies:
    None beyond serde derives.

  Operational Scope:
    Used across the schema validator, use-cases, and the CLI
    presentation layer.

  Revision History:
    2025-06-19 COD  Introduced roster entity types.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Remote wire shapes never leak past the adapter
============================================================*/

use serde::Serialize;

/// A validated roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: String, name: String, email: String) -> Self {
        Self { id, name, email }
    }
}

/// Input payload for creating a roster member.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
