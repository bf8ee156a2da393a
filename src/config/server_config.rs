//! HTTP listener configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid SERVER_PORT: {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            bind_address: env::var("SERVER_BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            port,
        })
    }
}
