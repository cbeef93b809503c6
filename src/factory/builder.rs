//! Builder pattern for factory configuration.
//!
//! # Example
//!
//! ```no_run
//! use user_script_factory::ScriptFactory;
//!
//! # fn example() -> user_script_factory::Result<()> {
//! let factory = ScriptFactory::builder()
//!     .bundle_dir("/opt/browser/user-scripts")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::farbling::{RandomManager, SESSION_KEY_LEN};
use crate::identifiers::SecurityToken;
use crate::source::{DirectoryLoader, EmbeddedLoader, SourceLoader};

use super::core::ScriptFactory;

// ============================================================================
// ScriptFactoryBuilder
// ============================================================================

/// Builder for configuring a [`ScriptFactory`].
///
/// Use [`ScriptFactory::builder()`] to create a new builder. Every setting is
/// optional: templates default to the embedded bundle, the session key and
/// security token to fresh random values.
#[derive(Default, Clone)]
pub struct ScriptFactoryBuilder {
    /// Custom template loader.
    loader: Option<Arc<dyn SourceLoader>>,
    /// Directory to load templates from.
    bundle_dir: Option<PathBuf>,
    /// Fixed farbling session key.
    session_key: Option<[u8; SESSION_KEY_LEN]>,
    /// Fixed security token.
    security_token: Option<String>,
}

impl fmt::Debug for ScriptFactoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptFactoryBuilder")
            .field("custom_loader", &self.loader.is_some())
            .field("bundle_dir", &self.bundle_dir)
            .field("fixed_session_key", &self.session_key.is_some())
            .field("fixed_security_token", &self.security_token.is_some())
            .finish()
    }
}

// ============================================================================
// ScriptFactoryBuilder Implementation
// ============================================================================

impl ScriptFactoryBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom template loader.
    #[inline]
    #[must_use]
    pub fn loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Loads templates from files in `path` instead of the embedded bundle.
    #[inline]
    #[must_use]
    pub fn bundle_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundle_dir = Some(path.into());
        self
    }

    /// Fixes the farbling session key.
    ///
    /// Seeds become reproducible across processes. Tests only.
    #[inline]
    #[must_use]
    pub fn session_key(mut self, key: [u8; SESSION_KEY_LEN]) -> Self {
        self.session_key = Some(key);
        self
    }

    /// Fixes the security token instead of generating one.
    #[inline]
    #[must_use]
    pub fn security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    /// Builds the factory with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if both a loader and a bundle directory are set
    /// - [`Error::Config`] if the bundle directory does not exist
    /// - [`Error::Config`] if the security token is not identifier-safe
    pub fn build(self) -> Result<ScriptFactory> {
        let loader = self.validate_loader()?;
        let security_token = self.validate_security_token()?;
        let random = self
            .session_key
            .map_or_else(RandomManager::new, RandomManager::with_session_key);

        Ok(ScriptFactory::from_parts(loader, random, security_token))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ScriptFactoryBuilder {
    /// Resolves the loader configuration.
    fn validate_loader(&self) -> Result<Arc<dyn SourceLoader>> {
        match (&self.loader, &self.bundle_dir) {
            (Some(_), Some(_)) => Err(Error::config(
                "Set either .loader() or .bundle_dir(), not both.",
            )),
            (Some(loader), None) => Ok(Arc::clone(loader)),
            (None, Some(dir)) => {
                if !dir.is_dir() {
                    return Err(Error::config(format!(
                        "Script bundle directory not found at: {}",
                        dir.display()
                    )));
                }
                Ok(Arc::new(DirectoryLoader::new(dir.clone())))
            }
            (None, None) => Ok(Arc::new(EmbeddedLoader)),
        }
    }

    /// Validates or generates the security token.
    fn validate_security_token(&self) -> Result<SecurityToken> {
        match &self.security_token {
            Some(token) => SecurityToken::new(token.clone()),
            None => Ok(SecurityToken::generate()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::script::ScriptType;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ScriptFactoryBuilder::new();
        assert!(builder.loader.is_none());
        assert!(builder.bundle_dir.is_none());
        assert!(builder.session_key.is_none());
        assert!(builder.security_token.is_none());
    }

    #[test]
    fn test_defaults_build() {
        let factory = ScriptFactoryBuilder::new().build().expect("default build");
        assert!(factory.build(&ScriptType::Nacl).is_ok());
    }

    #[test]
    fn test_security_token_is_validated() {
        let err = ScriptFactoryBuilder::new()
            .security_token("has-dash")
            .build()
            .unwrap_err();
        assert!(err.is_config_error());

        let factory = ScriptFactoryBuilder::new()
            .security_token("abc_123")
            .build()
            .expect("valid token");
        assert_eq!(factory.security_token().as_str(), "abc_123");
    }

    #[test]
    fn test_missing_bundle_dir_rejected() {
        let err = ScriptFactoryBuilder::new()
            .bundle_dir("/definitely/not/a/real/dir")
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_loader_and_bundle_dir_conflict() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ScriptFactoryBuilder::new()
            .loader(EmbeddedLoader)
            .bundle_dir(dir.path())
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_bundle_dir_without_template_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let factory = ScriptFactoryBuilder::new()
            .bundle_dir(dir.path())
            .build()
            .expect("existing dir");

        assert!(factory.build(&ScriptType::Nacl).unwrap_err().is_not_found());
    }

    #[test]
    fn test_session_key_makes_farbling_reproducible() {
        let script_type = ScriptType::farbling_protection("example.com");
        let a = ScriptFactoryBuilder::new()
            .session_key([9; SESSION_KEY_LEN])
            .build()
            .expect("a");
        let b = ScriptFactoryBuilder::new()
            .session_key([9; SESSION_KEY_LEN])
            .build()
            .expect("b");

        assert_eq!(
            a.build(&script_type).expect("a").source(),
            b.build(&script_type).expect("b").source()
        );
    }
}
