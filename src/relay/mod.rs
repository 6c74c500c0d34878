mod client;
mod types;

pub use client::{IMAGE_FIELD, UploadRelay, decode_response};
pub use types::*;
