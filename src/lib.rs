//! User Script Factory - cached, token-isolated script preparation.
//!
//! This library prepares the JavaScript a browser injects into web content
//! and caches it at two levels: raw bundled templates, and fully built
//! per-context scripts.
//!
//! # Architecture
//!
//! - **Source layer**: immutable templates identified by [`SourceType`],
//!   read once by a [`SourceLoader`] and kept in a [`SourceCache`]
//! - **Build layer**: a [`ScriptType`] (source plus context, e.g. a domain)
//!   is rendered by substituting `$<name>` placeholders and cached as a
//!   [`BuiltScript`]
//! - **Farbling**: per-domain noise derived from a keyed hash of the domain
//!   under a random session key
//! - **Tokens**: a [`SecurityToken`] names privileged functions so page code
//!   cannot forge calls into the message bridge
//!
//! The crate never touches a browser engine. Hosts take the [`BuiltScript`]
//! fields and inject them.
//!
//! # Quick Start
//!
//! ```
//! use user_script_factory::{DomainUserScript, ScriptFactory, ScriptType};
//!
//! # fn main() -> user_script_factory::Result<()> {
//! let factory = ScriptFactory::new();
//!
//! let url = url::Url::parse("https://search.brave.com/search?q=rust").unwrap();
//! for script in factory.build_all(ScriptType::for_page(&url, Some("brave.com")))? {
//!     // hand script.source(), script.injection_time(), ... to the host
//!     assert!(!script.source().is_empty());
//! }
//!
//! let helper = factory.build(&DomainUserScript::BraveSearchHelper.into())?;
//! assert!(helper.source().contains(factory.security_token().as_str()));
//!
//! // Memory pressure
//! factory.clear_all();
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`factory`] | [`ScriptFactory`] and its builder |
//! | [`source`] | Template identifiers, loaders and cache |
//! | [`script`] | Script types, substitution and built output |
//! | [`farbling`] | Seed derivation, fudge factor, fake plugins |
//! | [`identifiers`] | Security and message tokens |
//! | [`error`] | Error types and [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
pub mod error;

/// Script factory and configuration.
///
/// Use [`ScriptFactory::builder()`] to create a configured instance.
pub mod factory;

/// Per-domain farbling parameters.
pub mod farbling;

/// Type-safe token wrappers.
pub mod identifiers;

/// Script identifiers, templates and built output.
pub mod script;

/// Bundled script sources.
pub mod source;

// ============================================================================
// Re-exports
// ============================================================================

// Factory types
pub use factory::{CacheStats, ScriptFactory, ScriptFactoryBuilder};

// Script types
pub use script::{
    BuiltScript, ContentWorld, DomainUserScript, InjectionSettings, InjectionTime, ScriptType,
    ordered,
};

// Source types
pub use source::{DirectoryLoader, EmbeddedLoader, RawSource, SourceCache, SourceLoader, SourceType};

// Farbling types
pub use farbling::{FarblingParams, FarblingSeed, RandomManager};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{MessageToken, SecurityToken};
