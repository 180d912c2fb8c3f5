//! Identity of the user the current process acts for.
//!
//! Authentication itself is out of scope: the user id is supplied by the
//! `--user` flag, the `WORKSUITE_USER` environment variable or the config
//! file. What this module does own is the authorization predicate every
//! store applies before it touches a row by id.

use super::error::StoreError;
use anyhow::Result;

pub const USER_ENV: &str = "WORKSUITE_USER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(StoreError::invalid("user id must not be empty").into());
        }
        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Row-level ownership predicate.
    pub fn owns(&self, owner_id: &str) -> bool {
        self.user_id == owner_id
    }

    /// Fails with [`StoreError::Forbidden`] unless the row belongs to this session.
    pub fn authorize(&self, entity: &'static str, id: i64, owner_id: &str) -> Result<(), StoreError> {
        if self.owns(owner_id) {
            Ok(())
        } else {
            tracing::warn!(entity, id, user = %self.user_id, "rejected access to foreign row");
            Err(StoreError::Forbidden { entity, id })
        }
    }
}
