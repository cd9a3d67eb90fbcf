// Error taxonomy for the dashboard use cases
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to readings endpoint failed: {0}")]
    Transport(String),

    #[error("readings endpoint rejected the credential (status {0})")]
    Unauthorized(u16),

    #[error("readings endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed readings response: {0}")]
    Malformed(String),

    #[error("readings query failed: {0}")]
    Graphql(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("session expired")]
    Expired,

    #[error("credential rejected by the readings endpoint")]
    Rejected,

    #[error("identity provider error: {0}")]
    Provider(String),
}

/// What a refresh can fail with. Auth failures are kept apart from fetch
/// failures so the caller can send the user back to sign-in.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(FetchError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<FetchError> for DashboardError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Unauthorized(_) => DashboardError::Auth(AuthError::Rejected),
            other => DashboardError::Fetch(other),
        }
    }
}

impl DashboardError {
    pub fn is_auth(&self) -> bool {
        matches!(self, DashboardError::Auth(_))
    }
}
