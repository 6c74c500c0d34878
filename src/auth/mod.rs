pub mod cookie;
mod credentials;
mod session;

pub use credentials::CredentialValidator;
pub use session::{InMemorySessionStore, SessionStore, SessionToken};
