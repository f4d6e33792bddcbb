//! Credential handling for provider implementations.

mod credentials;

pub use credentials::ApiKey;
