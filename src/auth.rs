//! Teacher password gate
//!
//! A single shared secret unlocks the teacher area. A successful login yields
//! a session flag valid for seven days; there are no per-teacher accounts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::LexiGrowConfig;

pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Teacher password is not configured")]
    NotConfigured,

    #[error("Invalid teacher password")]
    InvalidPassword,
}

/// Proof of a successful teacher login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSession {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TeacherSession {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub struct TeacherGate {
    password: Option<String>,
}

impl std::fmt::Debug for TeacherGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeacherGate")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl TeacherGate {
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_config(config: &LexiGrowConfig) -> Self {
        Self::new(config.teacher_password.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.password.is_some()
    }

    /// Check the password and open a session.
    pub fn login(&self, attempt: &str, now: DateTime<Utc>) -> Result<TeacherSession, AuthError> {
        let expected = self.password.as_ref().ok_or(AuthError::NotConfigured)?;

        if !bool::from(expected.as_bytes().ct_eq(attempt.as_bytes())) {
            log::warn!("Rejected teacher login attempt");
            return Err(AuthError::InvalidPassword);
        }

        log::info!("Teacher logged in");
        Ok(TeacherSession {
            issued_at: now,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        })
    }
}
