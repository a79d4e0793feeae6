//! HTTP service around the masking engine and the category classifier.

pub mod app;
pub mod config;
pub mod logging;
pub mod routes;

pub use app::{build_app, AppState};
pub use config::Config;
