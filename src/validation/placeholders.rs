/*!
 * Placeholder extraction and post-translation auditing.
 *
 * Translations must reproduce certain sub-strings verbatim: printf-style
 * format specifiers, brace template tokens, markup tags, BBCode tags, and
 * bare URLs. This module finds those tokens in source text and checks that
 * none were lost in the translated text.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Unified placeholder pattern. Alternatives are tried in priority order at
/// each scan position: printf specifiers (including `%%`), the `%@` object
/// specifier, brace tokens, angle-bracket tags, square-bracket tags, URLs.
/// Case-insensitivity applies to the format specifiers only, so `%S` counts
/// but uppercase tags do not.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i:%(?:\d+\$)?[-+ 0#]*\d*(?:\.\d+)?(?:hh|h|ll|l|L|q|j|z|t)?[%diouxXeEfgGaAcspn])",
        r"|%@",
        r"|\{\w*\}",
        r"|</?[a-z][^<>]*/?>",
        r"|\[/?[a-z][^\[\]]*\]",
        r"|https?://\S+",
    ))
    .expect("Invalid placeholder regex")
});

/// One placeholder-loss warning produced while accepting a translation
#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderWarning {
    /// Work-item id the warning belongs to
    pub id: u32,
    /// Text that was sent for translation
    pub source: String,
    /// Translation the model returned
    pub translation: String,
    /// Tokens present in the source but absent from the translation
    pub missing: Vec<String>,
}

/// Placeholder validator for translated text
pub struct PlaceholderValidator;

impl PlaceholderValidator {
    /// Extract all placeholder tokens from `text`, left to right.
    ///
    /// Duplicates are preserved: a token appearing twice is returned twice.
    pub fn extract(text: &str) -> Vec<String> {
        PLACEHOLDER_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Find tokens of `source` that do not appear in `translation`.
    ///
    /// This is a substring-presence check per extracted token, not a
    /// multiset-count check: a token duplicated in the source but present
    /// once in the translation is not flagged. Kept for compatibility with
    /// the established behavior; a stricter occurrence-counting mode would
    /// be a deviation.
    pub fn find_missing(source: &str, translation: &str) -> Vec<String> {
        let tokens = Self::extract(source);
        if tokens.is_empty() {
            return Vec::new();
        }

        let missing: Vec<String> = tokens
            .into_iter()
            .filter(|token| !translation.contains(token.as_str()))
            .collect();

        if !missing.is_empty() {
            debug!(
                "Placeholder audit: {} token(s) missing from translation",
                missing.len()
            );
        }

        missing
    }

    /// Audit one accepted translation, producing a warning when tokens were
    /// lost. The translation is accepted either way; the warning is advisory.
    pub fn audit(id: u32, source: &str, translation: &str) -> Option<PlaceholderWarning> {
        let missing = Self::find_missing(source, translation);
        if missing.is_empty() {
            return None;
        }
        Some(PlaceholderWarning {
            id,
            source: source.to_string(),
            translation: translation.to_string(),
            missing,
        })
    }
}
