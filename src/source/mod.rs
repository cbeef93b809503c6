//! Bundled script sources.
//!
//! Every injectable script starts life as an immutable template shipped with
//! the application. This module names those templates and loads them.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SourceType`] | Identifier of one bundled template |
//! | [`SourceLoader`] | Reads a template from storage |
//! | [`EmbeddedLoader`] | Templates compiled into the binary |
//! | [`DirectoryLoader`] | Templates read from a directory |
//! | [`SourceCache`] | Memoizes loaded templates |

// ============================================================================
// Submodules
// ============================================================================

/// Source cache keyed by [`SourceType`].
pub mod cache;

/// Source loaders.
pub mod loader;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// Re-exports
// ============================================================================

pub use cache::SourceCache;
pub use loader::{DirectoryLoader, EmbeddedLoader, SourceLoader};

// ============================================================================
// Types
// ============================================================================

/// Raw template text, shared between the cache and its callers.
pub type RawSource = Arc<str>;

// ============================================================================
// SourceType
// ============================================================================

/// Identifier of a bundled script template.
///
/// The set is fixed at build time and each variant maps to exactly one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    /// Sealed-box crypto library other scripts depend on.
    Nacl,
    /// Fingerprinting noise for a registrable domain.
    FarblingProtection,
    /// YouTube ad-blocking helper.
    YoutubeAdBlock,
    /// archive.today compatibility fixes.
    Archive,
    /// Brave Search page helper.
    BraveSearchHelper,
    /// Brave Talk page helper.
    BraveTalkHelper,
}

impl SourceType {
    /// Every bundled source, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Nacl,
        Self::FarblingProtection,
        Self::YoutubeAdBlock,
        Self::Archive,
        Self::BraveSearchHelper,
        Self::BraveTalkHelper,
    ];

    /// Returns the bundled file name of this template.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Nacl => "nacl.min.js",
            Self::FarblingProtection => "FarblingProtectionScript.js",
            Self::YoutubeAdBlock => "YoutubeAdblock.js",
            Self::Archive => "ArchiveIsCompat.js",
            Self::BraveSearchHelper => "BraveSearchScript.js",
            Self::BraveTalkHelper => "BraveTalkScript.js",
        }
    }

    /// Returns the stable identifier used in logs and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nacl => "nacl",
            Self::FarblingProtection => "farblingProtection",
            Self::YoutubeAdBlock => "youtubeAdBlock",
            Self::Archive => "archive",
            Self::BraveSearchHelper => "braveSearchHelper",
            Self::BraveTalkHelper => "braveTalkHelper",
        }
    }
}

impl fmt::Display for SourceType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
