//! Turns relay outcomes into what the prediction page shows.

use crate::relay::{PredictionResult, RelayFailure};
use serde::Serialize;
use serde_json::Value;

pub const MISSING_UPLOAD_MESSAGE: &str = "Error: please choose an image file.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login details. Please try again.";

const ENDPOINT_HINT: &str =
    "Make sure PREDICTION_API_URL is correct and the backend is running.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub result_image: Option<String>,
    pub message: Option<String>,
    pub disease_details: Option<Vec<Value>>,
}

impl ViewModel {
    /// The blank prediction form.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn missing_upload() -> Self {
        Self::message_only(MISSING_UPLOAD_MESSAGE)
    }

    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        Self::message_only(format!("Unexpected error: {detail}."))
    }
}

pub fn present(outcome: Result<PredictionResult, RelayFailure>) -> ViewModel {
    match outcome {
        Ok(result) => ViewModel {
            result_image: Some(result.result_image_base64),
            message: Some(result.message),
            disease_details: Some(result.disease_details),
        },
        Err(RelayFailure::MissingUpload) => ViewModel::missing_upload(),
        Err(failure) => ViewModel::message_only(failure_message(&failure)),
    }
}

pub fn failure_message(failure: &RelayFailure) -> String {
    match failure {
        RelayFailure::MissingUpload => MISSING_UPLOAD_MESSAGE.to_string(),
        RelayFailure::Configuration => {
            "Configuration error: please set the PREDICTION_API_URL environment variable!"
                .to_string()
        }
        RelayFailure::Connection(detail) => {
            format!("API connection error: {detail}. {ENDPOINT_HINT}")
        }
        RelayFailure::Http { status, detail } => {
            format!("API connection error: HTTP {status}: {detail}. {ENDPOINT_HINT}")
        }
        RelayFailure::Decode(detail) => format!("General prediction error: {detail}."),
    }
}
