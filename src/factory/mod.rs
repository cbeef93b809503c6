//! Script factory module.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ScriptFactory`] | Builds and caches injectable scripts |
//! | [`ScriptFactoryBuilder`] | Fluent configuration builder |
//! | [`CacheStats`] | Cache counters snapshot |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for factory configuration.
pub mod builder;

/// Core factory implementation.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ScriptFactoryBuilder;
pub use self::core::{CacheStats, ScriptFactory};
