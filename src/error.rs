//! Error types for the script factory.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```
//! use user_script_factory::{Result, ScriptFactory, ScriptType};
//!
//! fn example(factory: &ScriptFactory) -> Result<()> {
//!     let script = factory.build(&ScriptType::Nacl)?;
//!     assert!(!script.source().is_empty());
//!     Ok(())
//! }
//! # example(&ScriptFactory::new()).unwrap();
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Bundle | [`Error::SourceNotFound`] |
//! | Configuration | [`Error::Config`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::source::SourceType;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Bundle Errors
    // ========================================================================
    /// Bundled script template not found.
    ///
    /// Every [`SourceType`] ships with a template, so hitting this at runtime
    /// means the bundle is broken. There is no fallback script.
    #[error("Script source not found: {source_type} ({file_name})", file_name = .source_type.file_name())]
    SourceNotFound {
        /// The source whose template is missing.
        source_type: SourceType,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when factory configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a source not found error.
    #[inline]
    pub fn source_not_found(source_type: SourceType) -> Self {
        Self::SourceNotFound { source_type }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if a bundled template was missing.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
