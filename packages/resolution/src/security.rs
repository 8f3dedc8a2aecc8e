//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate so API keys never leak into logs, debug output,
//! or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this at the point the key goes into a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_not_in_debug_or_display() {
        let secret = SecretString::new("sk-very-secret-key");
        assert!(!format!("{:?}", secret).contains("sk-very"));
        assert!(!format!("{}", secret).contains("sk-very"));
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
    }

    #[test]
    fn expose_returns_the_value() {
        let secret = SecretString::new("sk-very-secret-key");
        assert_eq!(secret.expose(), "sk-very-secret-key");
    }
}
