//! Script type identifiers.
//!
//! A [`ScriptType`] is a [`SourceType`] plus the context a build needs.
//! Structural equality over the variant and its parameters makes it the
//! built-script cache key.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::source::SourceType;

// ============================================================================
// DomainUserScript
// ============================================================================

/// Helper scripts injected only on specific sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainUserScript {
    /// Ad blocking on YouTube.
    YoutubeAdBlock,
    /// Compatibility fixes for archive.today mirrors.
    Archive,
    /// Brave Search integration.
    BraveSearchHelper,
    /// Brave Talk integration.
    BraveTalkHelper,
}

impl DomainUserScript {
    /// Every domain helper.
    pub const ALL: [Self; 4] = [
        Self::YoutubeAdBlock,
        Self::Archive,
        Self::BraveSearchHelper,
        Self::BraveTalkHelper,
    ];

    /// Hosts the helper applies to. Subdomains match too.
    #[must_use]
    pub const fn associated_domains(self) -> &'static [&'static str] {
        match self {
            Self::YoutubeAdBlock => &["youtube.com"],
            Self::Archive => &["archive.is", "archive.today", "archive.vn", "archive.fo"],
            Self::BraveSearchHelper => &[
                "search.brave.com",
                "search-dev.brave.com",
                "search.brave.software",
                "search.bravesoftware.com",
            ],
            Self::BraveTalkHelper => &[
                "talk.brave.com",
                "talk.brave.software",
                "talk.bravesoftware.com",
            ],
        }
    }

    /// Returns the bundled source of this helper.
    #[must_use]
    pub const fn source_type(self) -> SourceType {
        match self {
            Self::YoutubeAdBlock => SourceType::YoutubeAdBlock,
            Self::Archive => SourceType::Archive,
            Self::BraveSearchHelper => SourceType::BraveSearchHelper,
            Self::BraveTalkHelper => SourceType::BraveTalkHelper,
        }
    }

    /// Returns `true` if the helper talks to the host through sealed
    /// messages and needs the nacl library loaded before it.
    #[must_use]
    pub const fn requires_nacl(self) -> bool {
        matches!(self, Self::BraveSearchHelper | Self::BraveTalkHelper)
    }

    /// Finds the helper for `host`, if any.
    ///
    /// Matching is case-insensitive and ignores a trailing dot.
    /// `m.youtube.com` matches, `notyoutube.com` does not.
    #[must_use]
    pub fn for_host(host: &str) -> Option<Self> {
        let host = normalize_host(host);
        if host.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|helper| {
            helper.associated_domains().iter().any(|domain| {
                host == *domain
                    || host
                        .strip_suffix(domain)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
        })
    }

    /// Finds the helper for an `http(s)` page URL, if any.
    #[must_use]
    pub fn for_url(url: &Url) -> Option<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.host_str().and_then(Self::for_host)
    }
}

/// Lowercases and strips surrounding whitespace and a trailing dot.
pub(crate) fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

// ============================================================================
// ScriptType
// ============================================================================

/// A buildable script: a source plus its context parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptType {
    /// The nacl library, used as-is.
    Nacl,
    /// Farbling protection scoped to a registrable domain (eTLD+1).
    FarblingProtection {
        /// Registrable domain the noise is derived for.
        etld: String,
    },
    /// A site-specific helper.
    DomainUserScript {
        /// Which helper.
        script: DomainUserScript,
    },
}

impl ScriptType {
    /// Creates a farbling protection script type for `etld`.
    #[inline]
    #[must_use]
    pub fn farbling_protection(etld: impl Into<String>) -> Self {
        Self::FarblingProtection { etld: etld.into() }
    }

    /// Creates a domain helper script type.
    #[inline]
    #[must_use]
    pub const fn domain(script: DomainUserScript) -> Self {
        Self::DomainUserScript { script }
    }

    /// Returns the bundled source this script is built from.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Nacl => SourceType::Nacl,
            Self::FarblingProtection { .. } => SourceType::FarblingProtection,
            Self::DomainUserScript { script } => script.source_type(),
        }
    }

    /// Injection priority. Lower values are injected first.
    ///
    /// Later scripts may rely on globals defined by earlier ones.
    #[must_use]
    pub const fn order(&self) -> u8 {
        match self {
            Self::Nacl => 0,
            Self::FarblingProtection { .. } => 1,
            Self::DomainUserScript { .. } => 2,
        }
    }

    /// Collects the scripts a page needs, in injection order.
    ///
    /// `farbling_etld` is the page's registrable domain when farbling
    /// protection is enabled for it.
    #[must_use]
    pub fn for_page(url: &Url, farbling_etld: Option<&str>) -> Vec<Self> {
        let mut scripts = Vec::with_capacity(3);

        if let Some(etld) = farbling_etld {
            scripts.push(Self::farbling_protection(etld));
        }

        if let Some(helper) = DomainUserScript::for_url(url) {
            if helper.requires_nacl() {
                scripts.push(Self::Nacl);
            }
            scripts.push(Self::domain(helper));
        }

        ordered(scripts)
    }
}

impl From<DomainUserScript> for ScriptType {
    #[inline]
    fn from(script: DomainUserScript) -> Self {
        Self::domain(script)
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FarblingProtection { etld } => write!(f, "farblingProtection({etld})"),
            other => f.write_str(other.source_type().as_str()),
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Sorts script types into injection order.
///
/// Foundational libraries come first, protection scripts next and domain
/// helpers last. Equal priorities keep their input order.
#[must_use]
pub fn ordered(scripts: impl IntoIterator<Item = ScriptType>) -> Vec<ScriptType> {
    let mut scripts: Vec<_> = scripts.into_iter().collect();
    scripts.sort_by_key(ScriptType::order);
    scripts
}

// ============================================================================
// Tests
// ============================================================================
