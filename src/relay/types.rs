use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_MESSAGE: &str = "Prediction complete.";

/// An image received from the browser, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content: Bytes,
    pub content_type: Option<String>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn has_filename(&self) -> bool {
        !self.filename.is_empty()
    }
}

/// Body returned by the prediction API. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub result_image_base64: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub disease_details: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub result_image_base64: String,
    pub message: String,
    pub disease_details: Vec<Value>,
}

impl From<PredictionResponse> for PredictionResult {
    fn from(response: PredictionResponse) -> Self {
        let image = response.result_image_base64.unwrap_or_default();

        Self {
            result_image_base64: strip_data_url_prefix(&image).to_string(),
            message: response
                .message
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            disease_details: response.disease_details.unwrap_or_default(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayFailure {
    #[error("upload has no filename")]
    MissingUpload,

    #[error("prediction endpoint is not configured")]
    Configuration,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("decode error: {0}")]
    Decode(String),
}

/// Drops a `data:<mime>;base64,` prefix when present.
///
/// Any string containing both a comma and the text `base64` is treated as
/// prefixed, so everything up to the first comma is removed.
// TODO: match on a leading `data:` scheme instead once the prediction API
// clients agree that bare payloads never contain commas.
pub fn strip_data_url_prefix(image: &str) -> &str {
    if image.contains("base64") {
        if let Some((_, payload)) = image.split_once(',') {
            return payload;
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,XYZ"), "XYZ");
        assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBOR"), "iVBOR");
    }

    #[test]
    fn test_bare_payload_passes_through() {
        assert_eq!(strip_data_url_prefix("XYZ"), "XYZ");
        assert_eq!(strip_data_url_prefix(""), "");
        // a comma alone is not enough
        assert_eq!(strip_data_url_prefix("a,b"), "a,b");
        // nor is the marker alone
        assert_eq!(strip_data_url_prefix("base64XYZ"), "base64XYZ");
    }

    #[test]
    fn test_heuristic_strips_any_comma_with_marker() {
        assert_eq!(strip_data_url_prefix("abc,base64"), "base64");
    }

    #[test]
    fn test_result_defaults() {
        let result = PredictionResult::from(PredictionResponse::default());
        assert_eq!(result.result_image_base64, "");
        assert_eq!(result.message, DEFAULT_MESSAGE);
        assert!(result.disease_details.is_empty());
    }

    #[test]
    fn test_result_from_full_response() {
        let response: PredictionResponse = serde_json::from_value(json!({
            "result_image_base64": "data:image/jpeg;base64,QUJD",
            "message": "Detected 2 lesions",
            "disease_details": [
                {"name": "Brown spot", "confidence": 0.91},
                {"name": "Leaf blast", "confidence": 0.64}
            ]
        }))
        .unwrap();

        let result = PredictionResult::from(response);
        assert_eq!(result.result_image_base64, "QUJD");
        assert_eq!(result.message, "Detected 2 lesions");
        assert_eq!(result.disease_details.len(), 2);
        assert_eq!(result.disease_details[0]["name"], "Brown spot");
    }

    #[test]
    fn test_null_details_default_to_empty() {
        let response: PredictionResponse =
            serde_json::from_value(json!({ "disease_details": null })).unwrap();
        assert!(PredictionResult::from(response).disease_details.is_empty());
    }

    #[test]
    fn test_upload_request_filename_check() {
        assert!(UploadRequest::new("leaf.jpg", vec![1u8, 2, 3]).has_filename());
        assert!(!UploadRequest::new("", Vec::<u8>::new()).has_filename());
    }
}
