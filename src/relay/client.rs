use super::types::*;
use crate::{Result, config::PredictionConfig};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Multipart field name the prediction backend reads the image from.
pub const IMAGE_FIELD: &str = "image";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_ERROR_DETAIL_CHARS: usize = 512;

/// Forwards uploads to the remote prediction API.
pub struct UploadRelay {
    client: Client,
    config: PredictionConfig,
}

impl UploadRelay {
    pub fn new(config: PredictionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Resolves the endpoint, refusing placeholders and non-http URLs.
    fn endpoint_url(&self) -> std::result::Result<Url, RelayFailure> {
        if self.config.is_placeholder() {
            warn!("Prediction endpoint is still the placeholder, refusing to relay");
            return Err(RelayFailure::Configuration);
        }

        match Url::parse(self.config.endpoint.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            Ok(url) => {
                warn!("Unsupported prediction endpoint scheme: {}", url.scheme());
                Err(RelayFailure::Configuration)
            }
            Err(e) => {
                warn!("Invalid prediction endpoint URL: {}", e);
                Err(RelayFailure::Configuration)
            }
        }
    }

    pub async fn relay(
        &self,
        upload: UploadRequest,
    ) -> std::result::Result<PredictionResult, RelayFailure> {
        if !upload.has_filename() {
            info!("Upload has no filename, nothing to relay");
            return Err(RelayFailure::MissingUpload);
        }

        let url = self.endpoint_url()?;

        info!(
            "Relaying {} ({} bytes) to prediction API",
            upload.filename,
            upload.content.len()
        );

        let form = Form::new().part(IMAGE_FIELD, image_part(upload));

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Prediction API request failed: {}", e);
                connection_failure(&e, self.config.timeout_secs)
            })?;

        let status = response.status();
        debug!("Prediction API responded with status {}", status);

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read prediction API response: {}", e);
            connection_failure(&e, self.config.timeout_secs)
        })?;

        if !status.is_success() {
            warn!("Prediction API returned HTTP {}", status.as_u16());
            return Err(RelayFailure::Http {
                status: status.as_u16(),
                detail: truncate(&body),
            });
        }

        let result = decode_response(&body)?;
        info!(
            "Prediction received with {} disease details",
            result.disease_details.len()
        );

        Ok(result)
    }
}

fn image_part(upload: UploadRequest) -> Part {
    let UploadRequest {
        filename,
        content,
        content_type,
    } = upload;

    let content_type = content_type.unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    match Part::bytes(content.to_vec())
        .file_name(filename.clone())
        .mime_str(&content_type)
    {
        Ok(part) => part,
        Err(e) => {
            debug!("Unusable content type {:?}: {}", content_type, e);
            Part::bytes(content.to_vec()).file_name(filename)
        }
    }
}

fn connection_failure(error: &reqwest::Error, timeout_secs: u64) -> RelayFailure {
    if error.is_timeout() {
        RelayFailure::Connection(format!("request timed out after {timeout_secs}s ({error})"))
    } else {
        RelayFailure::Connection(error.to_string())
    }
}

pub fn decode_response(body: &str) -> std::result::Result<PredictionResult, RelayFailure> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| RelayFailure::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(RelayFailure::Decode(
            "expected a JSON object in the prediction response".to_string(),
        ));
    }

    let response: PredictionResponse =
        serde_json::from_value(value).map_err(|e| RelayFailure::Decode(e.to_string()))?;

    Ok(response.into())
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_DETAIL_CHARS).collect()
}
