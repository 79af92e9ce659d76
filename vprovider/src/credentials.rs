//! Redacting wrapper for provider API keys.
//!
//! ```rust
//! use vprovider::SecretString;
//!
//! let key = SecretString::new("sk-live-123");
//! assert_eq!(key.expose(), "sk-live-123");
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! ```

use crate::{ProviderError, ProviderId};

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Resolves the key a provider will authenticate with, rejecting blank keys
/// for providers that need one.
pub fn resolve_api_key(
    provider: ProviderId,
    api_key: Option<&str>,
) -> Result<Option<SecretString>, ProviderError> {
    let key = api_key
        .map(SecretString::new)
        .filter(|secret| !secret.is_empty());

    if key.is_none() && provider.requires_api_key() {
        return Err(ProviderError::authentication(format!(
            "{provider} requires a non-empty api key"
        )));
    }

    Ok(key)
}
