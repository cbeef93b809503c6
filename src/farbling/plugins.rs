//! Synthetic `navigator.plugins` entries.
//!
//! The names are stitched together from fragments real PDF viewer plugins
//! use, so the output looks like an ordinary browser install but varies per
//! domain.

// ============================================================================
// Imports
// ============================================================================

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Number of fake plugins appended to the real list.
pub const FAKE_PLUGIN_COUNT: usize = 2;

const NAME_FIRST_PARTS: &[&str] = &[
    "Chrome",
    "Chromium",
    "Brave",
    "Web",
    "Browser",
    "OpenSource",
    "Online",
    "JavaScript",
    "WebKit",
    "Web-Kit",
    "WK",
];

const NAME_SECOND_PARTS: &[&str] = &[
    "PDF",
    "Portable Document Format",
    "portable-document-format",
    "document",
    "doc",
    "PDF and PS",
    "com.adobe.pdf",
];

const NAME_THIRD_PARTS: &[&str] = &[
    "Viewer",
    "Renderer",
    "Display",
    "Plugin",
    "plug-in",
    "plug in",
    "extension",
];

/// `(type, suffixes)` pairs a PDF plugin plausibly registers.
const MIME_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("text/pdf", "pdf"),
    ("application/x-pdf", "pdf"),
    ("application/postscript", "ps"),
];

// ============================================================================
// Types
// ============================================================================

/// One fake plugin entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FakePlugin {
    /// Display name.
    pub name: String,
    /// Description string.
    pub description: String,
    /// Plugin file name.
    pub filename: String,
    /// Registered mime types.
    pub mime_types: Vec<FakeMimeType>,
}

/// One mime type registered by a [`FakePlugin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeMimeType {
    /// Mime type, e.g. `application/pdf`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Comma separated file suffixes.
    pub suffixes: String,
    /// Description string.
    pub description: String,
}

// ============================================================================
// Public Functions
// ============================================================================

/// Generates [`FAKE_PLUGIN_COUNT`] plugins from `rng`.
///
/// The same RNG state always yields the same plugins.
#[must_use]
pub fn make_fake_plugin_data(rng: &mut StdRng) -> Vec<FakePlugin> {
    (0..FAKE_PLUGIN_COUNT).map(|_| make_plugin(rng)).collect()
}

// ============================================================================
// Internal Functions
// ============================================================================

fn make_plugin(rng: &mut StdRng) -> FakePlugin {
    let name = make_name(rng);
    let description = make_name(rng);
    let filename = format!("internal-{}", slug(&name));

    let first = rng.random_range(0..MIME_TYPES.len());
    let mut picks = vec![first];
    if rng.random_bool(0.5) {
        picks.push((first + rng.random_range(1..MIME_TYPES.len())) % MIME_TYPES.len());
    }

    let mime_types = picks
        .into_iter()
        .map(|index| {
            let (mime_type, suffixes) = MIME_TYPES[index];
            FakeMimeType {
                mime_type: mime_type.to_string(),
                suffixes: suffixes.to_string(),
                description: description.clone(),
            }
        })
        .collect();

    FakePlugin {
        name,
        description,
        filename,
        mime_types,
    }
}

/// Builds `[first] second [third]` from the fragment tables.
fn make_name(rng: &mut StdRng) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);

    if rng.random_bool(0.8) {
        parts.push(pick(rng, NAME_FIRST_PARTS));
    }
    parts.push(pick(rng, NAME_SECOND_PARTS));
    if rng.random_bool(0.8) {
        parts.push(pick(rng, NAME_THIRD_PARTS));
    }

    parts.join(" ")
}

/// Picks one entry of a non-empty table.
fn pick(rng: &mut StdRng, table: &[&'static str]) -> &'static str {
    table[rng.random_range(0..table.len())]
}

/// Lowercases and joins words with `-`.
fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// ============================================================================
// Tests
// ============================================================================
