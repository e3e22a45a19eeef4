mod health;
mod metrics;
mod generate;

use axum::{Router, extract::DefaultBodyLimit, routing::{get, post}};
use std::sync::Arc;
use crate::state::AppState;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use generate::generate_handler;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // other verbs get 405 from the method router; prompt size is not capped
        .route("/generate", post(generate_handler).layer(DefaultBodyLimit::disable()))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
