use crate::config::AuthConfig;

/// Checks a submitted login against the one configured credential pair.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    username: String,
    password: String,
}

impl CredentialValidator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    pub fn validate(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
