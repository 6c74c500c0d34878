use crate::{Error, Result};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Signed opaque value handed to the client as the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Server-side authority on who is logged in.
///
/// Handlers pass the raw cookie value (if any) as the client context; the
/// store alone decides whether it maps to a live session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn start_session(&self, identity: &str) -> SessionToken;

    async fn identity(&self, token: Option<&str>) -> Option<String>;

    /// Removes the association. Calling it without a live session is a no-op.
    async fn end_session(&self, token: Option<&str>);

    async fn is_authenticated(&self, token: Option<&str>) -> bool {
        self.identity(token).await.is_some()
    }
}

#[derive(Debug, Clone)]
struct SessionRecord {
    username: String,
    created_at: DateTime<Utc>,
}

pub struct InMemorySessionStore {
    mac: HmacSha256,
    ttl: Option<Duration>,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new(secret_key: &str, ttl_secs: Option<i64>) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| Error::config(format!("invalid session secret key: {e}")))?;

        Ok(Self {
            mac,
            ttl: ttl_secs.map(Duration::seconds),
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn sign(&self, session_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Returns the session id if the token carries a valid signature.
    fn verify<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (session_id, signature) = token.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(session_id)
    }

    fn is_expired(&self, record: &SessionRecord) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now() - record.created_at > ttl,
            None => false,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn start_session(&self, identity: &str) -> SessionToken {
        let session_id = Uuid::new_v4().to_string();
        let record = SessionRecord {
            username: identity.to_string(),
            created_at: Utc::now(),
        };

        let mut sessions = self.sessions.write().await;

        // reclaim abandoned sessions
        let before = sessions.len();
        sessions.retain(|_, existing| !self.is_expired(existing));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!("Swept {} expired sessions", swept);
        }

        sessions.insert(session_id.clone(), record);
        drop(sessions);

        info!("Session started for user: {}", identity);

        let signature = self.sign(&session_id);
        SessionToken(format!("{session_id}.{signature}"))
    }

    async fn identity(&self, token: Option<&str>) -> Option<String> {
        let Some(session_id) = token.and_then(|t| self.verify(t)) else {
            if token.is_some() {
                debug!("Rejected session cookie with invalid signature");
            }
            return None;
        };

        let record = self.sessions.read().await.get(session_id).cloned()?;

        if self.is_expired(&record) {
            warn!("Session expired for user: {}", record.username);
            self.sessions.write().await.remove(session_id);
            return None;
        }

        Some(record.username)
    }

    async fn end_session(&self, token: Option<&str>) {
        let Some(session_id) = token.and_then(|t| self.verify(t)) else {
            return;
        };

        if let Some(record) = self.sessions.write().await.remove(session_id) {
            info!("Session ended for user: {}", record.username);
        }
    }
}
