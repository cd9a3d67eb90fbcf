// Presentation layer - HTTP routes
pub mod app_state;
pub mod error_response;
pub mod handlers;
pub mod session_cookie;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chart_state, dashboard_page, health_check, refresh, sign_in, sign_out,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/chart", get(chart_state))
        .route("/session", post(sign_in).delete(sign_out))
        .route("/refresh", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
