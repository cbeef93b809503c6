//! Script identifiers, templates and built output.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ScriptType`] | Cache key: source plus context parameters |
//! | [`DomainUserScript`] | Site-specific helpers and their hosts |
//! | [`BuiltScript`] | Final text plus injection metadata |
//! | [`template`] | `$<name>` substitution |

// ============================================================================
// Submodules
// ============================================================================

/// Built scripts and injection metadata.
pub mod built;

/// Placeholder substitution.
pub mod template;

/// Script type identifiers and ordering.
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use built::{BuiltScript, ContentWorld, InjectionSettings, InjectionTime};
pub use types::{DomainUserScript, ScriptType, ordered};
