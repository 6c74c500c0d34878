pub mod auth;
pub mod config;
pub mod error;
pub mod presenter;
pub mod relay;
pub mod server;

pub use error::{Error, Result};
