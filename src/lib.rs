pub mod axum_api;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod hyper_api;
pub mod models;
pub mod rest;
pub mod schema;
pub mod service;
pub mod store;

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, GenericError>;

/// Resolves on Ctrl+C; both listeners drain on it.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
