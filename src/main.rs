// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::credential_provider::CredentialProvider;
use crate::application::readings_repository::FetchWindow;
use crate::infrastructure::cognito_provider::CognitoProvider;
use crate::infrastructure::config::{load_dashboard_config, DashboardConfig, ProviderKind};
use crate::infrastructure::graphql_repository::GraphqlReadingsRepository;
use crate::infrastructure::static_token_provider::StaticTokenProvider;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let timeout = Duration::from_secs(config.api.timeout_secs);

    // Create adapters (infrastructure layer)
    let credentials = credential_provider(&config, timeout)?;
    let repository = Arc::new(GraphqlReadingsRepository::new(
        config.api.endpoint(),
        config.cdn.base_url.clone(),
        timeout,
    )?);

    // Each signed-in client gets its own chart controller (application layer)
    let window = FetchWindow::days(config.dashboard.window_days);
    let state = Arc::new(AppState::new(credentials, repository, window));
    let router = presentation::router(state.clone());

    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!(
        %addr,
        endpoint = %config.api.endpoint(),
        window_days = window.as_days(),
        "Starting aurora-dashboard"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.close_all().await;
    tracing::info!("aurora-dashboard shut down");

    Ok(())
}

fn credential_provider(
    config: &DashboardConfig,
    timeout: Duration,
) -> anyhow::Result<Arc<dyn CredentialProvider>> {
    let auth = &config.auth;
    let provider: Arc<dyn CredentialProvider> = match auth.provider {
        ProviderKind::Cognito => {
            let region = auth.region.clone().unwrap_or_default();
            let client_id = auth.client_id.clone().unwrap_or_default();
            tracing::info!(
                %region,
                user_pool_id = auth.user_pool_id.as_deref().unwrap_or("-"),
                identity_pool_id = auth.identity_pool_id.as_deref().unwrap_or("-"),
                "Using Cognito credential provider"
            );
            Arc::new(CognitoProvider::new(&region, client_id, timeout)?)
        }
        ProviderKind::Static => {
            tracing::warn!("Using static token credential provider");
            Arc::new(StaticTokenProvider::new(
                auth.static_token.clone().unwrap_or_default(),
            ))
        }
    };
    Ok(provider)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
