//! Type-safe token wrappers.
//!
//! Injected scripts name their privileged functions and message handlers
//! after random tokens so page-authored code cannot guess and forge them.
//!
//! | Type | Lifetime | Used for |
//! |------|----------|----------|
//! | [`SecurityToken`] | One per factory | Function name prefixes, bridge checks |
//! | [`MessageToken`] | One per built helper script | Message handler names |
//!
//! Both are 32 lowercase hex characters (UUID v4, simple form) so they are
//! valid inside JavaScript identifiers.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================================================
// Helpers
// ============================================================================

/// Mints a fresh identifier-safe token.
fn mint() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns `true` if `value` can be embedded in a JavaScript identifier.
fn is_identifier_safe(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

// ============================================================================
// SecurityToken
// ============================================================================

/// Process-wide token proving a call originates from an injected script.
///
/// Minted once when the factory is built and immutable afterwards. The
/// message bridge trusts only payloads carrying this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityToken(String);

impl SecurityToken {
    /// Generates a new random token.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(mint())
    }

    /// Wraps an existing token value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the value is empty or contains characters
    /// that are not allowed in a JavaScript identifier.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !is_identifier_safe(&value) {
            return Err(Error::config(format!(
                "security token must be non-empty and contain only [A-Za-z0-9_], got {value:?}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the token as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `candidate` matches this token.
    #[inline]
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Display for SecurityToken {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// MessageToken
// ============================================================================

/// Per-script token naming a message handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageToken(String);

impl MessageToken {
    /// Generates a new random token.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(mint())
    }

    /// Returns the token as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageToken {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
