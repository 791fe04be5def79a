//! Secret handling with automatic memory zeroization.
//!
//! Wraps sensitive strings (the SMTP password) so they are wiped from memory
//! on drop and never leak through `Debug`/`Display` output or logs.

use serde::Deserialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper that zeroizes its memory when dropped
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
	/// Creates a new secret string
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Exposes the underlying secret value.
	///
	/// Call sites should pass the result on immediately rather than storing it.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[REDACTED]")
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString([REDACTED])")
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}
