//! Configuration module for the credit scoring service.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Model, Server, and Observability.

mod model_config;
mod observability_config;
mod server_config;

pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT, ServerEnvConfig};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Model (from ModelEnvConfig)
    pub model_path: PathBuf,

    // Server (from ServerEnvConfig)
    pub bind_address: String,
    pub port: u16,

    // Observability (from ObservabilityEnvConfig)
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let model = ModelEnvConfig::from_env();
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            model_path: model.model_path,
            bind_address: server.bind_address,
            port: server.port,
            metrics_enabled: observability.metrics_enabled,
        })
    }

    /// Socket address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid listen address {}:{}",
                    self.bind_address, self.port
                )
            })
    }
}
