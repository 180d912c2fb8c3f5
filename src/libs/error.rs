//! Domain errors raised by the stores.
//!
//! Plumbing failures (SQLite, I/O, JSON) travel as `anyhow::Error`; the
//! variants here are the ones callers are expected to match on, so they are
//! kept as a closed `thiserror` enum and can be recovered with
//! `anyhow::Error::downcast_ref::<StoreError>()`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} #{id} belongs to another user")]
    Forbidden { entity: &'static str, id: i64 },

    #[error("invalid input: {0}")]
    Invalid(String),
}

impl StoreError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        StoreError::Invalid(reason.into())
    }
}
