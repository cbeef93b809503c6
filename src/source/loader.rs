//! Template loaders.
//!
//! A loader turns a [`SourceType`] into template text. Loaders hold no
//! mutable state, so they are safe to call from any thread and as often as
//! needed; the [`SourceCache`](super::SourceCache) keeps them from being
//! called more than once per template.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};

use super::{RawSource, SourceType};

// ============================================================================
// SourceLoader
// ============================================================================

/// Reads bundled script templates from storage.
pub trait SourceLoader: Send + Sync {
    /// Loads the template for `source_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if no template matches.
    fn load(&self, source_type: SourceType) -> Result<RawSource>;
}

impl<L: SourceLoader + ?Sized> SourceLoader for Arc<L> {
    #[inline]
    fn load(&self, source_type: SourceType) -> Result<RawSource> {
        (**self).load(source_type)
    }
}

// ============================================================================
// EmbeddedLoader
// ============================================================================

/// Loads templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

impl EmbeddedLoader {
    /// Returns the embedded text for `source_type`.
    #[must_use]
    pub const fn template(source_type: SourceType) -> &'static str {
        match source_type {
            SourceType::Nacl => include_str!("../../assets/scripts/nacl.min.js"),
            SourceType::FarblingProtection => {
                include_str!("../../assets/scripts/FarblingProtectionScript.js")
            }
            SourceType::YoutubeAdBlock => include_str!("../../assets/scripts/YoutubeAdblock.js"),
            SourceType::Archive => include_str!("../../assets/scripts/ArchiveIsCompat.js"),
            SourceType::BraveSearchHelper => {
                include_str!("../../assets/scripts/BraveSearchScript.js")
            }
            SourceType::BraveTalkHelper => include_str!("../../assets/scripts/BraveTalkScript.js"),
        }
    }
}

impl SourceLoader for EmbeddedLoader {
    fn load(&self, source_type: SourceType) -> Result<RawSource> {
        let text = Self::template(source_type);
        if text.is_empty() {
            return Err(Error::source_not_found(source_type));
        }

        debug!(source = %source_type, len = text.len(), "Loaded embedded script source");
        Ok(Arc::from(text))
    }
}

// ============================================================================
// DirectoryLoader
// ============================================================================

/// Loads templates from `<root>/<file name>`.
///
/// Useful when scripts ship as separate resources next to the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLoader {
    /// Directory containing the template files.
    root: PathBuf,
}

impl DirectoryLoader {
    /// Creates a loader rooted at `root`.
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the template directory.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the full path of the template for `source_type`.
    #[inline]
    #[must_use]
    pub fn path_of(&self, source_type: SourceType) -> PathBuf {
        self.root.join(source_type.file_name())
    }
}

impl SourceLoader for DirectoryLoader {
    fn load(&self, source_type: SourceType) -> Result<RawSource> {
        let path = self.path_of(source_type);

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(source = %source_type, path = %path.display(), "Loaded script source from disk");
                Ok(Arc::from(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::source_not_found(source_type))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
