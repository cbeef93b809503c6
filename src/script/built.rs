//! Ready-to-inject scripts.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::{DomainUserScript, ScriptType};

// ============================================================================
// Injection Metadata
// ============================================================================

/// When the host should inject the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InjectionTime {
    /// Before any page script runs.
    DocumentStart,
    /// After the document has been parsed.
    DocumentEnd,
}

/// Execution world the script runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentWorld {
    /// The page's own world.
    Page,
    /// The engine's default isolated world.
    Defaults,
}

/// Static injection settings of a script type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InjectionSettings {
    /// Injection timing.
    pub injection_time: InjectionTime,
    /// Inject into the main frame only.
    pub main_frame_only: bool,
    /// Execution world.
    pub content_world: ContentWorld,
}

impl InjectionSettings {
    /// Returns the settings for `script_type`. Never computed per build.
    #[must_use]
    pub const fn for_script(script_type: &ScriptType) -> Self {
        let main_frame_only = matches!(
            script_type,
            ScriptType::DomainUserScript {
                script: DomainUserScript::BraveSearchHelper | DomainUserScript::BraveTalkHelper
            }
        );

        Self {
            injection_time: InjectionTime::DocumentStart,
            main_frame_only,
            content_world: ContentWorld::Page,
        }
    }
}

// ============================================================================
// BuiltScript
// ============================================================================

/// Final script body plus the metadata the host injector needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltScript {
    /// Substituted source text.
    source: Arc<str>,

    /// Injection timing.
    injection_time: InjectionTime,

    /// Inject into the main frame only.
    main_frame_only: bool,

    /// Execution world.
    content_world: ContentWorld,
}

impl BuiltScript {
    /// Creates a built script from its parts.
    #[inline]
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>, settings: InjectionSettings) -> Self {
        Self {
            source: source.into(),
            injection_time: settings.injection_time,
            main_frame_only: settings.main_frame_only,
            content_world: settings.content_world,
        }
    }

    /// Returns the script text.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the injection timing.
    #[inline]
    #[must_use]
    pub const fn injection_time(&self) -> InjectionTime {
        self.injection_time
    }

    /// Returns `true` if the script must only run in the main frame.
    #[inline]
    #[must_use]
    pub const fn main_frame_only(&self) -> bool {
        self.main_frame_only
    }

    /// Returns the execution world.
    #[inline]
    #[must_use]
    pub const fn content_world(&self) -> ContentWorld {
        self.content_world
    }
}

// ============================================================================
// Tests
// ============================================================================
