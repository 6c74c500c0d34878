mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from(&config_path).await?;
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// Reads a YAML config file, falling back to defaults when it does not exist.
pub async fn load_from(config_path: &str) -> Result<Config> {
    if !Path::new(config_path).exists() {
        debug!("No configuration file at {}, using defaults", config_path);
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Environment variables win over the file for deploy-time secrets.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup("PREDICTION_API_URL") {
        config.prediction.endpoint = endpoint;
    }
    if let Some(secret) = lookup("SESSION_SECRET_KEY") {
        config.auth.secret_key = secret;
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.auth.username.is_empty() {
            return Err(Error::config("auth.username must not be empty"));
        }
        if self.auth.secret_key.is_empty() {
            return Err(Error::config("auth.secret_key must not be empty"));
        }
        if self.prediction.timeout_secs == 0 {
            return Err(Error::config("prediction.timeout_secs must be positive"));
        }
        Ok(())
    }
}
