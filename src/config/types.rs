use serde::{Deserialize, Serialize};

/// Marker left in the endpoint URL until a real backend is configured.
pub const ENDPOINT_PLACEHOLDER: &str = "YOUR-BACKEND-API-URL";

pub const DEV_SECRET_KEY: &str = "default_secret_key_for_dev";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// The single credential pair plus session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,
    #[serde(default = "default_marker_cookie_name")]
    pub marker_cookie_name: String,
    #[serde(default)]
    pub cookie_secure: bool,
    /// Server-side session lifetime; `null` keeps sessions until logout.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            secret_key: default_secret_key(),
            session_cookie_name: default_session_cookie_name(),
            marker_cookie_name: default_marker_cookie_name(),
            cookie_secure: false,
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}

impl PredictionConfig {
    /// True when the endpoint was never pointed at a real backend.
    pub fn is_placeholder(&self) -> bool {
        self.endpoint.trim().is_empty() || self.endpoint.contains(ENDPOINT_PLACEHOLDER)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_username() -> String {
    "user_demo".to_string()
}

fn default_password() -> String {
    "Test@123456".to_string()
}

fn default_secret_key() -> String {
    DEV_SECRET_KEY.to_string()
}

fn default_session_cookie_name() -> String {
    "session".to_string()
}

fn default_marker_cookie_name() -> String {
    "session_active".to_string()
}

fn default_session_ttl_secs() -> Option<i64> {
    Some(24 * 60 * 60)
}

fn default_endpoint() -> String {
    format!("https://{ENDPOINT_PLACEHOLDER}.vercel.app/api")
}

fn default_timeout_secs() -> u64 {
    45
}
