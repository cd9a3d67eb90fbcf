// Cognito user pool credential provider (username/password flow)
use crate::application::credential_provider::{CredentialProvider, Credentials, Session};
use crate::application::error::AuthError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

#[derive(Debug, Clone)]
pub struct CognitoProvider {
    client: reqwest::Client,
    endpoint: String,
    client_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct AuthParameters<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GlobalSignOutRequest<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

impl CognitoProvider {
    pub fn new(region: &str, client_id: String, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_endpoint(
            format!("https://cognito-idp.{}.amazonaws.com/", region),
            client_id,
            timeout,
        )
    }

    pub fn with_endpoint(endpoint: String, client_id: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            client_id,
        })
    }

    async fn call<B: Serialize + Sync, R: DeserializeOwned + Send>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<R, AuthError> {
        let payload = serde_json::to_vec(body).map_err(|e| AuthError::Provider(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, action))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(payload)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("{} request failed: {}", action, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !status.is_success() {
            let error: ServiceError = serde_json::from_str(&text).unwrap_or(ServiceError {
                kind: String::new(),
                message: text.clone(),
            });
            return Err(Self::map_service_error(status.as_u16(), error));
        }

        serde_json::from_str(&text)
            .map_err(|e| AuthError::Provider(format!("unexpected {} response: {}", action, e)))
    }

    fn map_service_error(status: u16, error: ServiceError) -> AuthError {
        // __type may carry a namespace prefix, e.g. "com.amazon...#NotAuthorizedException"
        let kind = error.kind.rsplit('#').next().unwrap_or_default();
        match kind {
            "NotAuthorizedException" | "UserNotFoundException" => AuthError::InvalidCredentials,
            "" => AuthError::Provider(format!("status {}: {}", status, error.message)),
            other => AuthError::Provider(format!("{}: {}", other, error.message)),
        }
    }
}

#[async_trait]
impl CredentialProvider for CognitoProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let request = InitiateAuthRequest {
            auth_flow: "USER_PASSWORD_AUTH",
            client_id: &self.client_id,
            auth_parameters: AuthParameters {
                username: &credentials.username,
                password: &credentials.password,
            },
        };
        let response: InitiateAuthResponse = self.call("InitiateAuth", &request).await?;

        match (response.authentication_result, response.challenge_name) {
            (Some(result), _) => {
                tracing::info!(user = %credentials.username, "Signed in");
                Ok(Session::new(
                    credentials.username.clone(),
                    result.access_token,
                    result.expires_in.map(Duration::from_secs),
                ))
            }
            (None, Some(challenge)) => Err(AuthError::Provider(format!(
                "sign-in challenge {} is not supported",
                challenge
            ))),
            (None, None) => Err(AuthError::Provider(
                "sign-in returned no authentication result".to_string(),
            )),
        }
    }

    async fn sign_out(&self, session: Session) -> Result<(), AuthError> {
        let request = GlobalSignOutRequest {
            access_token: session.access_token(),
        };
        let _: serde_json::Value = self.call("GlobalSignOut", &request).await?;
        tracing::info!(user = session.username(), "Signed out");
        Ok(())
    }
}
