use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use leaf_scan::{
    config::{AuthConfig, Config, LogsConfig, PredictionConfig, ServerConfig},
    server,
};
use tower::ServiceExt; // for `oneshot`

pub const TEST_USERNAME: &str = "user_demo";
pub const TEST_PASSWORD: &str = "Test@123456";
pub const BOUNDARY: &str = "leafscanboundary";

/// Create a test configuration pointing the relay at `endpoint`
pub fn create_test_config(endpoint: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        auth: AuthConfig {
            username: TEST_USERNAME.to_string(),
            password: TEST_PASSWORD.to_string(),
            secret_key: "test-secret".to_string(),
            ..AuthConfig::default()
        },
        prediction: PredictionConfig {
            endpoint: endpoint.to_string(),
            timeout_secs: 5,
        },
    }
}

pub fn create_test_app(endpoint: &str) -> Router {
    let state = server::build_state(create_test_config(endpoint)).unwrap();
    server::router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn login_request(username: &str, password: &str, cookie: Option<&str>) -> Request<Body> {
    form_post(&[("username", username), ("password", password)], cookie)
}

/// POSTs url-encoded `fields` to the login route
pub fn form_post(fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();
    raw_post(
        "/",
        Some("application/x-www-form-urlencoded"),
        Body::from(body),
        cookie,
    )
}

/// POSTs `body` as-is, with an optional `Content-Type`
pub fn raw_post(
    uri: &str,
    content_type: Option<&str>,
    body: Body,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(body).unwrap()
}

/// Logs in with the test credentials and returns a `Cookie` header value
pub async fn login(app: &Router) -> String {
    let response = send(app, login_request(TEST_USERNAME, TEST_PASSWORD, None)).await;
    assert_eq!(location(&response), Some("/predict"));

    set_cookies(&response)
        .iter()
        .filter_map(|c| c.split(';').next().map(str::to_string))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Builds a multipart body with a single `image` file part.
///
/// Written by hand so tests can send parts a browser would, such as an
/// empty filename.
pub fn multipart_body(filename: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn predict_request(body: Vec<u8>, cookie: Option<&str>) -> Request<Body> {
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    raw_post("/predict", Some(&content_type), Body::from(body), cookie)
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 3000
  logs:
    level: "debug"

auth:
  username: "alice"
  password: "hunter2"
  secret_key: "yaml-secret"
  session_ttl_secs: 3600

prediction:
  endpoint: "https://rice-detector.example.com/api"
  timeout_secs: 30
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;
