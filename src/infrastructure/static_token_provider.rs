// Fixed-token credential provider for local development
use crate::application::credential_provider::{CredentialProvider, Credentials, Session};
use crate::application::error::AuthError;
use async_trait::async_trait;

/// Signs any named user in with a preconfigured bearer token. The password is ignored.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if credentials.username.trim().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        tracing::info!(user = %credentials.username, "Signed in with static token");
        Ok(Session::new(credentials.username.clone(), self.token.clone(), None))
    }

    async fn sign_out(&self, session: Session) -> Result<(), AuthError> {
        tracing::info!(user = session.username(), "Signed out");
        Ok(())
    }
}
