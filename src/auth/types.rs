//! Authentication types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verified caller identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user id (the token subject)
    pub user_id: String,
    /// Email claim, when the issuer provides one
    pub email: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

/// Upstream API key for one caller
///
/// Formatting never reveals the value; use [`Credential::expose`] at the
/// single point where it is written into a request header. Surrounding
/// whitespace is stripped on construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if secret.trim().len() == secret.len() {
            Self(secret)
        } else {
            Self(secret.trim().to_string())
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted, {} bytes>)", self.0.len())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
