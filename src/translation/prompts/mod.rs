/*!
 * Prompt engineering for UI-string translation.
 *
 * This module provides:
 * - The system prompt shared by every request
 * - JSON payload construction for a batch of work items
 * - Per-target worked examples
 */

pub mod templates;

// Re-export main types
pub use templates::{ExampleItem, PromptItem, TranslationPromptBuilder, SYSTEM_PROMPT};
