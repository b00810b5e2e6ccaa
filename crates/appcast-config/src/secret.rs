//! Secret resolution at the process boundary.

use std::fmt;

use zeroize::Zeroizing;

use crate::types::SignerConfig;

/// A secret string, zeroized on drop and redacted in debug output.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The secret text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(<redacted>)")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Read the signing secret from the variable named by `signing.secret_env`.
///
/// Unset, empty and whitespace-only values all count as absent.
#[must_use]
pub fn resolve_secret(config: &SignerConfig) -> Option<SecretString> {
    resolve_secret_with(config, |name| std::env::var(name).ok())
}

/// [`resolve_secret`] with a custom environment lookup.
#[must_use]
pub fn resolve_secret_with(
    config: &SignerConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    let raw = Zeroizing::new(env(&config.signing.secret_env)?);
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(SecretString::new(trimmed))
}
