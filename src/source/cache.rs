//! Memoized template storage.
//!
//! ```text
//! get(SourceType) ──► hit? ──yes──► Arc<str>
//!                      │
//!                      no
//!                      ▼
//!                SourceLoader::load ──► insert ──► Arc<str>
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::Result;

use super::{RawSource, SourceLoader, SourceType};

// ============================================================================
// SourceCache
// ============================================================================

/// Caches loaded templates by [`SourceType`].
///
/// The lock guards only the map; the loader runs outside it. Two threads
/// missing on the same key at once may both load, and the first insert wins.
pub struct SourceCache {
    /// Backing storage reader.
    loader: Arc<dyn SourceLoader>,

    /// Loaded templates.
    entries: Mutex<FxHashMap<SourceType, RawSource>>,

    /// Number of loader invocations that succeeded.
    loads: AtomicUsize,
}

impl fmt::Debug for SourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceCache")
            .field("len", &self.len())
            .field("loads", &self.load_count())
            .finish_non_exhaustive()
    }
}

impl SourceCache {
    /// Creates an empty cache over `loader`.
    #[must_use]
    pub fn new(loader: Arc<dyn SourceLoader>) -> Self {
        Self {
            loader,
            entries: Mutex::new(FxHashMap::default()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Returns the template for `source_type`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::SourceNotFound`](crate::Error::SourceNotFound)
    /// from the loader. Failures are not cached.
    pub fn get(&self, source_type: SourceType) -> Result<RawSource> {
        if let Some(source) = self.entries.lock().get(&source_type) {
            debug!(source = %source_type, "Script source cache hit");
            return Ok(Arc::clone(source));
        }

        let loaded = self.loader.load(source_type)?;
        self.loads.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.lock();
        let source = Arc::clone(entries.entry(source_type).or_insert(loaded));
        debug!(source = %source_type, cached = entries.len(), "Script source cached");

        Ok(source)
    }

    /// Drops every cached template.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "Script source cache cleared");
    }

    /// Returns the number of cached templates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns how many times the loader has successfully run.
    #[inline]
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Tests
// ============================================================================
