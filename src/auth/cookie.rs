//! Session and marker cookie helpers.

use crate::config::AuthConfig;
use axum::http::{HeaderMap, header};

/// Builds a `Set-Cookie` value for `name=value` with the configured flags.
pub fn build_set_cookie(config: &AuthConfig, name: &str, value: &str) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly; SameSite=Lax; Path=/");

    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    if let Some(ttl) = config.session_ttl_secs {
        cookie.push_str(&format!("; Max-Age={ttl}"));
    }

    cookie
}

/// Builds an immediately-expiring `Set-Cookie` value that clears `name`.
pub fn build_clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

pub fn session_cookie(config: &AuthConfig, token: &str) -> String {
    build_set_cookie(config, &config.session_cookie_name, token)
}

/// The marker only mirrors login state; it never grants access.
pub fn marker_cookie(config: &AuthConfig) -> String {
    build_set_cookie(config, &config.marker_cookie_name, "true")
}

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_flags() {
        let config = AuthConfig {
            cookie_secure: true,
            session_ttl_secs: Some(3600),
            ..AuthConfig::default()
        };

        let cookie = session_cookie(&config, "abc.def");
        assert!(cookie.starts_with("session=abc.def"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_marker_cookie_is_http_only() {
        let cookie = marker_cookie(&AuthConfig::default());
        assert!(cookie.starts_with("session_active=true"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn test_clear_cookie_expires() {
        let cookie = build_clear_cookie("session_active");
        assert!(cookie.starts_with("session_active=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_active=true; session=abc.def; empty="),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc.def".to_string())
        );
        assert_eq!(
            extract_cookie(&headers, "session_active"),
            Some("true".to_string())
        );
        assert_eq!(extract_cookie(&headers, "empty"), None);
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }
}
