// HTTP request handlers
use crate::application::chart_service::{DisplayState, DisplayedError, ErrorKind, RefreshOutcome};
use crate::application::credential_provider::Credentials;
use crate::application::error::{AuthError, DashboardError};
use crate::infrastructure::chart_renderer::render_page;
use crate::presentation::app_state::{AppState, ClientSession};
use crate::presentation::session_cookie;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct SessionInfo {
    pub username: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub sequence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<usize>,
    /// Sequence already on screen when this response was discarded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed: Option<u64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The dashboard page
pub async fn dashboard_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let Some(id) = session_cookie::client_id(&headers) else {
        return Html(render_page(&DisplayState::default(), None));
    };

    match state.client(&id).await {
        Some(client) => Html(render_page(
            &client.chart.snapshot(),
            Some(client.session.username()),
        )),
        None => {
            // The cookie outlived its session
            let ended = DisplayState {
                error: Some(DisplayedError {
                    kind: ErrorKind::Auth,
                    message: "Your session has ended.".to_string(),
                    sequence: 0,
                }),
                ..DisplayState::default()
            };
            Html(render_page(&ended, None))
        }
    }
}

/// Current chart model as JSON
pub async fn chart_state(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DisplayState>, DashboardError> {
    let client = signed_in_client(&state, &headers).await?;
    Ok(Json(client.chart.snapshot()))
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, DashboardError> {
    let session = state.credentials.sign_in(&credentials).await?;
    let username = session.username().to_string();

    if let Some(previous) = session_cookie::client_id(&headers) {
        if let Some(client) = state.close_session(&previous).await {
            tracing::debug!(user = client.session.username(), "Replacing existing session");
        }
    }

    let id = state.open_session(session).await;
    tracing::info!(user = %username, "Signed in");

    Ok((
        [(header::SET_COOKIE, session_cookie::set_cookie(&id))],
        Json(SessionInfo { username }),
    ))
}

pub async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let client = match session_cookie::client_id(&headers) {
        Some(id) => state.close_session(&id).await,
        None => None,
    };

    if let Some(client) = client {
        tracing::info!(user = client.session.username(), "Signed out");
        if let Err(e) = state.credentials.sign_out(client.session.clone()).await {
            tracing::warn!(error = %e, "Sign-out at the identity provider failed");
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session_cookie::clear_cookie())],
    )
}

/// Run one refresh against the caller's session
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, DashboardError> {
    let client = signed_in_client(&state, &headers).await?;

    let response = match client.chart.refresh(&client.session).await {
        RefreshOutcome::Applied {
            sequence,
            retained,
            dropped,
        } => RefreshResponse {
            status: "applied",
            sequence,
            retained: Some(retained),
            dropped: Some(dropped),
            displayed: None,
        },
        RefreshOutcome::Stale {
            sequence,
            displayed,
        } => RefreshResponse {
            status: "stale",
            sequence,
            retained: None,
            dropped: None,
            displayed: Some(displayed),
        },
        RefreshOutcome::Cancelled { sequence } => RefreshResponse {
            status: "cancelled",
            sequence,
            retained: None,
            dropped: None,
            displayed: None,
        },
        RefreshOutcome::Failed { sequence, error } => {
            if error.is_auth() {
                if let Some(id) = session_cookie::client_id(&headers) {
                    // Only end the session this refresh ran under
                    if state.close_session_if(&id, &client).await {
                        tracing::info!(sequence, user = client.session.username(), "Session ended after auth failure");
                    }
                }
            }
            return Err(error);
        }
    };

    Ok(Json(response))
}

async fn signed_in_client(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<ClientSession>, DashboardError> {
    let id = session_cookie::client_id(headers).ok_or(AuthError::NotSignedIn)?;
    let client = state.client(&id).await.ok_or(AuthError::NotSignedIn)?;
    Ok(client)
}
