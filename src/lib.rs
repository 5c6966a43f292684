pub mod auth;
pub mod config;
pub mod error;
pub mod error_handler;
pub mod models;
pub mod openapi;
pub mod repo;
pub mod routes;
pub mod sanitize;
pub mod security;
pub mod validation;

// Re-export commonly used items for tests / external users
pub use auth::AuthGate;
pub use config::{AppConfig, Environment};
pub use error_handler::ErrorHandler;
pub use routes::{config, AppState};
pub use security::SecurityHeaders;
