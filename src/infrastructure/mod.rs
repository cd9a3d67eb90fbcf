// Infrastructure layer - External dependencies and adapters
pub mod chart_renderer;
pub mod cognito_provider;
pub mod config;
pub mod graphql_repository;
pub mod static_token_provider;
