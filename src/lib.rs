pub mod client_ip;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;
pub mod telemetry;

use axum::{
    Router,
    routing::{any, get},
};

use crate::handlers::{contact_info_handler, health_handler, metrics_handler};
use crate::state::AppState;

// creating the router with routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/contact-info", any(contact_info_handler)) // method gating is done in the handler
        .with_state(state)
}
