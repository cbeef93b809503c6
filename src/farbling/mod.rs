//! Per-domain farbling parameters.
//!
//! Farbling adds small, domain-stable noise to values pages can read so the
//! same browser looks different to unrelated sites.
//!
//! # Derivation
//!
//! ```text
//! session key (random per factory)
//!        │
//!        ▼
//! blake3::keyed_hash(key, normalized eTLD+1) ──► FarblingSeed ──► StdRng
//!                                                                  │
//!                                       ┌──────────────────────────┤
//!                                       ▼                          ▼
//!                               fudge factor               fake plugin data
//!                               [0.99, 1.0)
//! ```
//!
//! The same domain maps to the same seed for the life of a
//! [`RandomManager`]. A new manager draws a new session key, so seeds do not
//! carry over across restarts and cannot be correlated across domains.

// ============================================================================
// Submodules
// ============================================================================

/// Synthetic plugin metadata.
pub mod plugins;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::script::types::normalize_host;

// ============================================================================
// Re-exports
// ============================================================================

pub use plugins::{FakeMimeType, FakePlugin, make_fake_plugin_data};

// ============================================================================
// Constants
// ============================================================================

/// Lowest fudge factor.
///
/// Multipliers close to zero make the noise obvious to fingerprinting
/// scripts. Keep this exact value.
pub const FUDGE_FACTOR_MIN: f64 = 0.99;

/// Exclusive upper bound of the fudge factor. Reaching 1.0 produces
/// out-of-range values in the scripts that consume it.
pub const FUDGE_FACTOR_MAX: f64 = 1.0;

/// Session key length in bytes.
pub const SESSION_KEY_LEN: usize = blake3::KEY_LEN;

// ============================================================================
// FarblingSeed
// ============================================================================

/// Seed derived for one domain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FarblingSeed([u8; 32]);

impl FarblingSeed {
    /// Returns the raw seed bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Creates a deterministic RNG from this seed.
    #[inline]
    #[must_use]
    pub fn rng(&self) -> StdRng {
        StdRng::from_seed(self.0)
    }
}

impl fmt::Debug for FarblingSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FarblingSeed").finish_non_exhaustive()
    }
}

// ============================================================================
// RandomManager
// ============================================================================

/// Owns the session key and derives domain seeds from it.
#[derive(Clone)]
pub struct RandomManager {
    session_key: [u8; SESSION_KEY_LEN],
}

impl fmt::Debug for RandomManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomManager").finish_non_exhaustive()
    }
}

impl Default for RandomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomManager {
    /// Creates a manager with a fresh random session key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_key: rand::random(),
        }
    }

    /// Creates a manager with a fixed session key.
    ///
    /// Seeds become reproducible across processes, which defeats the
    /// purpose in production. Meant for tests and replay tooling.
    #[inline]
    #[must_use]
    pub const fn with_session_key(session_key: [u8; SESSION_KEY_LEN]) -> Self {
        Self { session_key }
    }

    /// Derives the seed for `domain`.
    ///
    /// Case, surrounding whitespace and a trailing dot are ignored.
    #[must_use]
    pub fn derive_seed(&self, domain: &str) -> FarblingSeed {
        let domain = normalize_host(domain);
        let hash = blake3::keyed_hash(&self.session_key, domain.as_bytes());
        FarblingSeed(*hash.as_bytes())
    }
}

// ============================================================================
// Fudge Factor
// ============================================================================

/// Draws the next fudge factor, uniform in `[0.99, 1.0)`.
#[must_use]
pub fn next_fudge_factor(rng: &mut StdRng) -> f64 {
    rng.random_range(FUDGE_FACTOR_MIN..FUDGE_FACTOR_MAX)
}

// ============================================================================
// FarblingParams
// ============================================================================

/// Everything the farbling script needs for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarblingParams {
    /// Multiplier applied to noisy values.
    pub fudge_factor: f64,
    /// Plugins appended to `navigator.plugins`.
    pub fake_plugin_data: Vec<FakePlugin>,
}

impl FarblingParams {
    /// Derives the parameters for `etld` from one seeded RNG.
    #[must_use]
    pub fn derive(manager: &RandomManager, etld: &str) -> Self {
        let mut rng = manager.derive_seed(etld).rng();
        let fudge_factor = next_fudge_factor(&mut rng);
        let fake_plugin_data = make_fake_plugin_data(&mut rng);

        Self {
            fudge_factor,
            fake_plugin_data,
        }
    }

    /// Formats the fudge factor as a JavaScript number literal.
    #[must_use]
    pub fn fudge_factor_literal(&self) -> String {
        format!("{:?}", self.fudge_factor)
    }

    /// Serializes the fake plugin data as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn fake_plugin_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fake_plugin_data)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_seed_is_stable_per_manager() {
        let manager = RandomManager::new();
        assert_eq!(
            manager.derive_seed("example.com"),
            manager.derive_seed("example.com")
        );
    }

    #[test]
    fn test_seed_ignores_case_and_trailing_dot() {
        let manager = RandomManager::new();
        assert_eq!(
            manager.derive_seed("Example.COM."),
            manager.derive_seed("example.com")
        );
    }

    #[test]
    fn test_seeds_differ_across_domains() {
        let manager = RandomManager::new();
        let seeds: FxHashSet<_> = (0..1000)
            .map(|i| manager.derive_seed(&format!("site{i}.example")))
            .collect();
        assert_eq!(seeds.len(), 1000);
    }

    #[test]
    fn test_seeds_differ_across_sessions() {
        let a = RandomManager::new();
        let b = RandomManager::new();
        assert_ne!(a.derive_seed("example.com"), b.derive_seed("example.com"));
    }

    #[test]
    fn test_fixed_session_key_is_reproducible() {
        let a = RandomManager::with_session_key([7; SESSION_KEY_LEN]);
        let b = RandomManager::with_session_key([7; SESSION_KEY_LEN]);
        assert_eq!(
            FarblingParams::derive(&a, "example.com"),
            FarblingParams::derive(&b, "example.com")
        );
    }

    #[test]
    fn test_params_differ_across_domains() {
        let manager = RandomManager::new();
        let a = FarblingParams::derive(&manager, "example.com");
        let b = FarblingParams::derive(&manager, "other.com");
        assert_ne!(a.fudge_factor, b.fudge_factor);
    }

    #[test]
    fn test_fudge_factor_literal_is_a_number() {
        let params = FarblingParams {
            fudge_factor: 0.995,
            fake_plugin_data: Vec::new(),
        };
        assert_eq!(params.fudge_factor_literal(), "0.995");
        assert_eq!(params.fake_plugin_json().expect("json"), "[]");
    }

    #[test]
    fn test_debug_hides_key_material() {
        let manager = RandomManager::with_session_key([0xAB; SESSION_KEY_LEN]);
        let debug = format!("{manager:?} {:?}", manager.derive_seed("a.com"));
        assert_eq!(debug, "RandomManager { .. } FarblingSeed(..)");
    }

    proptest! {
        #[test]
        fn prop_fudge_factor_in_range(seed in any::<[u8; 32]>()) {
            let mut rng = StdRng::from_seed(seed);
            for _ in 0..16 {
                let fudge = next_fudge_factor(&mut rng);
                prop_assert!((FUDGE_FACTOR_MIN..FUDGE_FACTOR_MAX).contains(&fudge));
            }
        }

        #[test]
        fn prop_derived_params_stable(domain in "[a-z]{1,20}\\.(com|org|net)") {
            let manager = RandomManager::with_session_key([1; SESSION_KEY_LEN]);
            let first = FarblingParams::derive(&manager, &domain);
            let second = FarblingParams::derive(&manager, &domain);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.fudge_factor >= FUDGE_FACTOR_MIN);
            prop_assert!(first.fudge_factor < FUDGE_FACTOR_MAX);
        }
    }
}
