/*!
 * Lightweight language heuristics for catalog source text.
 *
 * Work-item selection needs a cheap guess at whether a string is written in
 * English or German. These checks are lexical only (character ranges and
 * small word lists) and are advisory: a wrong guess changes the language
 * hint sent to the model, never the correctness of the pipeline.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Common English UI vocabulary. ASCII alone is not enough to call a string
/// English (codes and numbers are ASCII too), so a word hit is also required.
static ENGLISH_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(accept|settings|cookie|filter|configure|products?|reviews?|customer|archive|example|save|cancel|next|previous|email|password|sign|log|home|about|contact|help)\b",
    )
    .expect("English hint regex must compile")
});

/// Common German function words (articles, conjunctions, prepositions).
static GERMAN_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(der|die|das|und|ist|nicht|für|mit|ein|eine|zu|von|auf|als|auch)\b")
        .expect("German hint regex must compile")
});

/// Characters that only occur in German text within this domain.
const GERMAN_DIACRITICS: [char; 7] = ['ä', 'ö', 'ü', 'ß', 'Ä', 'Ö', 'Ü'];

/// A source language the heuristics can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// English
    En,
    /// German
    De,
}

impl SourceLanguage {
    /// ISO 639-1 code used on the wire and in logs
    pub fn code(&self) -> &'static str {
        match self {
            SourceLanguage::En => "en",
            SourceLanguage::De => "de",
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Check if a string looks like English UI text.
///
/// Requires both signals: the string is pure ASCII and it contains at least
/// one common English UI word. Empty input never matches.
pub fn looks_english(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    text.is_ascii() && ENGLISH_HINTS.is_match(text)
}

/// Check if a string looks like German text.
///
/// A German diacritic anywhere is a strong positive signal and short-circuits
/// the function-word check. Empty input never matches.
pub fn looks_german(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.chars().any(|c| GERMAN_DIACRITICS.contains(&c)) {
        return true;
    }
    GERMAN_HINTS.is_match(text)
}

/// Check a string against one recognized source language.
pub fn looks_like(text: &str, language: SourceLanguage) -> bool {
    match language {
        SourceLanguage::En => looks_english(text),
        SourceLanguage::De => looks_german(text),
    }
}

/// Guess the source language of a string.
///
/// German only wins when the German heuristic passes and the English one
/// fails; everything else is tagged English. The result is a hint for the
/// translation request, not a gate.
pub fn detect_source_language(text: &str) -> SourceLanguage {
    if looks_german(text) && !looks_english(text) {
        SourceLanguage::De
    } else {
        SourceLanguage::En
    }
}
