// Application layer - Use cases and the seams to external collaborators
pub mod chart_service;
pub mod credential_provider;
pub mod error;
pub mod readings_repository;
