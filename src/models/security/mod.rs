//! Security models for handling sensitive configuration values.

mod secret;

pub use secret::SecretString;
