//! Application setup and shared state.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use mailmask_core::{CategoryClassifier, Redactor};
use tower_http::trace::TraceLayer;

use crate::routes::{classify_handler, health_handler, root_handler};

/// Shared application state, read-only once the server is up
#[derive(Clone)]
pub struct AppState {
    pub redactor: Arc<Redactor>,
    pub classifier: Option<Arc<dyn CategoryClassifier>>,
}

impl AppState {
    pub fn new(redactor: Arc<Redactor>, classifier: Option<Arc<dyn CategoryClassifier>>) -> Self {
        Self {
            redactor,
            classifier,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/classify", post(classify_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
