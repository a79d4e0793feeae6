use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            host: env::var("MAILMASK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "7860".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            model_path: env::var("MAILMASK_MODEL_PATH")
                .unwrap_or_else(|_| "model.json".to_string())
                .into(),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
