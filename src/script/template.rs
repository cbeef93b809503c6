//! `$<name>` placeholder substitution.
//!
//! Templates mark substitution points as `$<name>` where `name` is made of
//! ASCII letters, digits and underscores. Substitution is a single pass, so
//! a value that happens to contain `$<...>` is never expanded again.
//!
//! ```
//! use user_script_factory::script::template::{substitute, unresolved_placeholders};
//!
//! let out = substitute("window.$<name> = 1;", &[("name", "hook_abc")]);
//! assert_eq!(out, "window.hook_abc = 1;");
//! assert!(unresolved_placeholders(&out).is_empty());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// ============================================================================
// Constants
// ============================================================================

/// Matches one placeholder and captures its name.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$<([A-Za-z0-9_]+)>").expect("placeholder pattern is valid")
});

// ============================================================================
// Public Functions
// ============================================================================

/// Replaces every `$<name>` whose name appears in `values`.
///
/// Unknown placeholders are left untouched. Returns the input unchanged
/// (borrowed) when nothing matched.
#[must_use]
pub fn substitute<'a>(source: &'a str, values: &[(&str, &str)]) -> Cow<'a, str> {
    if values.is_empty() {
        return Cow::Borrowed(source);
    }

    PLACEHOLDER.replace_all(source, |caps: &Captures<'_>| {
        let name = &caps[1];
        values
            .iter()
            .find(|(key, _)| *key == name)
            .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
    })
}

/// Lists the names of placeholders still present in `source`, in order of
/// first appearance and without duplicates.
#[must_use]
pub fn unresolved_placeholders(source: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(source) {
        if let Some(name) = caps.get(1).map(|m| m.as_str())
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    names
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        let out = substitute(
            "$<a>();$<b>($<a>);",
            &[("a", "first"), ("b", "second")],
        );
        assert_eq!(out, "first();second(first);");
    }

    #[test]
    fn test_substitute_leaves_unknown_names() {
        let out = substitute("$<known>+$<unknown>", &[("known", "1")]);
        assert_eq!(out, "1+$<unknown>");
        assert_eq!(unresolved_placeholders(&out), vec!["unknown"]);
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let out = substitute("$<a>", &[("a", "$<b>"), ("b", "nope")]);
        assert_eq!(out, "$<b>");
    }

    #[test]
    fn test_substitute_without_values_borrows() {
        let out = substitute("plain $<x>", &[]);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_dollar_signs_in_code_are_not_placeholders() {
        let source = "const $el = $('#id'); const t = `${x}`;";
        assert!(unresolved_placeholders(source).is_empty());
        assert_eq!(substitute(source, &[("x", "y")]), source);
    }

    #[test]
    fn test_unresolved_deduplicates() {
        assert_eq!(
            unresolved_placeholders("$<a> $<b> $<a>"),
            vec!["a", "b"]
        );
    }
}
