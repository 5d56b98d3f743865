/*!
 * Validation for translated catalog text.
 *
 * Translations are accepted even when a check fires; validators produce
 * advisory warnings that end up in the run report and the issues log.
 *
 * - `placeholders`: Checks that format specifiers, template tokens, markup,
 *   and URLs survive translation
 */

pub mod placeholders;

// Re-export main types
pub use placeholders::{PlaceholderValidator, PlaceholderWarning};
