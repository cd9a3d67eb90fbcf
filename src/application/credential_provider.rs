// Credential provider trait and the session it hands out
use crate::application::error::AuthError;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[cfg(test)]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// An authenticated session. Created by `CredentialProvider::sign_in` and
/// consumed by `CredentialProvider::sign_out`.
#[derive(Clone)]
pub struct Session {
    username: String,
    access_token: String,
    expires_at: Option<Instant>,
}

impl Session {
    pub fn new(username: String, access_token: String, ttl: Option<Duration>) -> Self {
        Self {
            username,
            access_token,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("token_len", &self.access_token.len())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    async fn sign_out(&self, session: Session) -> Result<(), AuthError>;

    /// Bearer token for the readings endpoint.
    fn token(&self, session: &Session) -> Result<String, AuthError> {
        if session.is_expired() {
            return Err(AuthError::Expired);
        }
        Ok(session.access_token().to_string())
    }
}
