//! Script factory and its two caches.
//!
//! ```text
//! build(ScriptType)
//!     │
//!     ├─ built-script cache hit ───────────────────────────► Arc<BuiltScript>
//!     │
//!     └─ miss ─► SourceCache::get(source_type) ─► substitute ─► insert ─┘
//! ```
//!
//! The built-script cache depends on the source cache. [`ScriptFactory::clear_all`]
//! empties both; there is no selective invalidation.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::farbling::{FarblingParams, RandomManager};
use crate::identifiers::{MessageToken, SecurityToken};
use crate::script::template::{substitute, unresolved_placeholders};
use crate::script::{BuiltScript, DomainUserScript, InjectionSettings, ScriptType, ordered};
use crate::source::{EmbeddedLoader, RawSource, SourceCache, SourceLoader, SourceType};

use super::builder::ScriptFactoryBuilder;

// ============================================================================
// Placeholders
// ============================================================================

const FUDGE_FACTOR: &str = "fudge_factor";
const FAKE_PLUGIN_DATA: &str = "fake_plugin_data";
const PRUNE_PATHS: &str = "prune_paths";
const FIND_OWNER: &str = "find_owner";
const SET_JS: &str = "set_js";
const BRAVE_SEARCH_HELPER: &str = "brave_search_helper";
const BRAVE_TALK_HELPER: &str = "brave_talk_helper";
const SECURITY_TOKEN: &str = "security_token";
const MESSAGE_HANDLER: &str = "message_handler";

// ============================================================================
// CacheStats
// ============================================================================

/// Snapshot of cache counters.
///
/// Counters are cumulative for the factory's lifetime and survive
/// [`ScriptFactory::clear_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Templates read from storage.
    pub source_loads: usize,
    /// Scripts built through substitution.
    pub script_builds: usize,
    /// Build requests answered from the built-script cache.
    pub cache_hits: usize,
    /// Templates currently cached.
    pub cached_sources: usize,
    /// Built scripts currently cached.
    pub cached_scripts: usize,
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the factory.
pub(crate) struct FactoryInner {
    /// Raw template cache.
    sources: SourceCache,

    /// Built scripts by exact script type.
    scripts: Mutex<FxHashMap<ScriptType, Arc<BuiltScript>>>,

    /// Farbling seed derivation.
    random: RandomManager,

    /// Token embedded in privileged function names.
    security_token: SecurityToken,

    /// Number of substitution passes performed.
    builds: AtomicUsize,

    /// Number of built-script cache hits.
    hits: AtomicUsize,
}

// ============================================================================
// ScriptFactory
// ============================================================================

/// Prepares and caches injectable scripts.
///
/// Cloning is cheap and clones share caches. Independent factories share
/// nothing, including tokens and farbling seeds.
///
/// # Examples
///
/// ```
/// use user_script_factory::{ScriptFactory, ScriptType};
///
/// # fn example() -> user_script_factory::Result<()> {
/// let factory = ScriptFactory::new();
///
/// let first = factory.build(&ScriptType::farbling_protection("example.com"))?;
/// let again = factory.build(&ScriptType::farbling_protection("example.com"))?;
/// assert_eq!(first, again);
///
/// // Memory pressure
/// factory.clear_all();
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct ScriptFactory {
    /// Shared inner state.
    pub(crate) inner: Arc<FactoryInner>,
}

// ============================================================================
// ScriptFactory - Display
// ============================================================================

impl fmt::Debug for ScriptFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptFactory")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Default for ScriptFactory {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ScriptFactory - Public API
// ============================================================================

impl ScriptFactory {
    /// Creates a factory over the embedded templates with fresh tokens and
    /// a fresh session key.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(EmbeddedLoader),
            RandomManager::new(),
            SecurityToken::generate(),
        )
    }

    /// Creates a configuration builder for the factory.
    ///
    /// # Example
    ///
    /// ```
    /// use user_script_factory::ScriptFactory;
    ///
    /// # fn example() -> user_script_factory::Result<()> {
    /// let factory = ScriptFactory::builder()
    ///     .security_token("fixedToken123")
    ///     .build()?;
    /// assert_eq!(factory.security_token().as_str(), "fixedToken123");
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    #[inline]
    #[must_use]
    pub fn builder() -> ScriptFactoryBuilder {
        ScriptFactoryBuilder::new()
    }

    /// Returns the token the message bridge must check payloads against.
    #[inline]
    #[must_use]
    pub fn security_token(&self) -> &SecurityToken {
        &self.inner.security_token
    }

    /// Returns the raw template for `source_type`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`](crate::Error::SourceNotFound) if the
    /// template is missing from the bundle.
    pub fn source(&self, source_type: SourceType) -> Result<RawSource> {
        self.inner.sources.get(source_type)
    }

    /// Returns the ready-to-inject script for `script_type`.
    ///
    /// Equal script types return the same cached [`Arc`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`](crate::Error::SourceNotFound) if the
    /// template is missing from the bundle.
    pub fn build(&self, script_type: &ScriptType) -> Result<Arc<BuiltScript>> {
        if let Some(script) = self.inner.scripts.lock().get(script_type) {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            debug!(script = %script_type, "Built script cache hit");
            return Ok(Arc::clone(script));
        }

        let raw = self.inner.sources.get(script_type.source_type())?;
        let source = self.render(script_type, &raw)?;

        let unresolved = unresolved_placeholders(&source);
        if !unresolved.is_empty() {
            warn!(
                script = %script_type,
                placeholders = ?unresolved,
                "Built script still contains placeholders"
            );
        }

        let built = Arc::new(BuiltScript::new(
            source,
            InjectionSettings::for_script(script_type),
        ));
        self.inner.builds.fetch_add(1, Ordering::Relaxed);

        let mut scripts = self.inner.scripts.lock();
        let script = Arc::clone(scripts.entry(script_type.clone()).or_insert(built));
        debug!(
            script = %script_type,
            len = script.source().len(),
            cached = scripts.len(),
            "Built script cached"
        );

        Ok(script)
    }

    /// Builds several scripts and returns them in injection order.
    ///
    /// # Errors
    ///
    /// Fails on the first missing template.
    pub fn build_all(
        &self,
        script_types: impl IntoIterator<Item = ScriptType>,
    ) -> Result<Vec<Arc<BuiltScript>>> {
        ordered(script_types)
            .iter()
            .map(|script_type| self.build(script_type))
            .collect()
    }

    /// Empties both caches.
    ///
    /// Intended for memory-pressure notifications. The next request for any
    /// script pays the full reload and rebuild.
    pub fn clear_all(&self) {
        let dropped_scripts = {
            let mut scripts = self.inner.scripts.lock();
            let count = scripts.len();
            scripts.clear();
            count
        };
        let dropped_sources = self.inner.sources.len();
        self.inner.sources.clear();

        info!(dropped_scripts, dropped_sources, "Script caches cleared");
    }

    /// Returns a snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            source_loads: self.inner.sources.load_count(),
            script_builds: self.inner.builds.load(Ordering::Relaxed),
            cache_hits: self.inner.hits.load(Ordering::Relaxed),
            cached_sources: self.inner.sources.len(),
            cached_scripts: self.inner.scripts.lock().len(),
        }
    }
}

// ============================================================================
// ScriptFactory - Internal API
// ============================================================================

impl ScriptFactory {
    /// Creates a factory from already validated parts.
    pub(crate) fn from_parts(
        loader: Arc<dyn SourceLoader>,
        random: RandomManager,
        security_token: SecurityToken,
    ) -> Self {
        let inner = Arc::new(FactoryInner {
            sources: SourceCache::new(loader),
            scripts: Mutex::new(FxHashMap::default()),
            random,
            security_token,
            builds: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
        });

        info!("Script factory initialized");

        Self { inner }
    }

    /// Applies the substitutions of `script_type` to `raw`.
    fn render(&self, script_type: &ScriptType, raw: &RawSource) -> Result<RawSource> {
        let token = self.inner.security_token.as_str();

        let rendered = match script_type {
            ScriptType::Nacl
            | ScriptType::DomainUserScript {
                script: DomainUserScript::Archive,
            } => return Ok(Arc::clone(raw)),

            ScriptType::FarblingProtection { etld } => {
                let params = FarblingParams::derive(&self.inner.random, etld);
                let fudge_factor = params.fudge_factor_literal();
                let plugins = params.fake_plugin_json()?;
                debug!(etld = %etld, fudge_factor = %fudge_factor, "Derived farbling parameters");

                substitute(
                    raw,
                    &[(FUDGE_FACTOR, fudge_factor.as_str()), (FAKE_PLUGIN_DATA, plugins.as_str())],
                )
                .into_owned()
            }

            ScriptType::DomainUserScript {
                script: DomainUserScript::YoutubeAdBlock,
            } => {
                let prune_paths = format!("ABSPP{token}");
                let find_owner = format!("ABSFO{token}");
                let set_js = format!("ABSSJ{token}");

                substitute(
                    raw,
                    &[
                        (PRUNE_PATHS, prune_paths.as_str()),
                        (FIND_OWNER, find_owner.as_str()),
                        (SET_JS, set_js.as_str()),
                    ],
                )
                .into_owned()
            }

            ScriptType::DomainUserScript {
                script: DomainUserScript::BraveSearchHelper,
            } => {
                let helper = format!("BSH{token}");
                let handler = format!("braveSearchHelper_{}", MessageToken::generate());

                substitute(
                    raw,
                    &[
                        (BRAVE_SEARCH_HELPER, helper.as_str()),
                        (SECURITY_TOKEN, token),
                        (MESSAGE_HANDLER, handler.as_str()),
                    ],
                )
                .into_owned()
            }

            ScriptType::DomainUserScript {
                script: DomainUserScript::BraveTalkHelper,
            } => {
                let helper = format!("BT{token}");
                let handler = format!("braveTalkHelper_{}", MessageToken::generate());

                substitute(
                    raw,
                    &[
                        (BRAVE_TALK_HELPER, helper.as_str()),
                        (SECURITY_TOKEN, token),
                        (MESSAGE_HANDLER, handler.as_str()),
                    ],
                )
                .into_owned()
            }
        };

        Ok(Arc::from(rendered))
    }
}

// ============================================================================
// Tests
// ============================================================================
