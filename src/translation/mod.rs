/*!
 * Translation pipeline for PO catalog entries.
 *
 * This module contains the core functionality for translating catalog
 * entries using an OpenAI-compatible API. It is split into several
 * submodules:
 *
 * - `core`: Capability trait, retry policy, response normalization, and the
 *   OpenAI-backed service
 * - `batch`: Batch driving with per-item failure recovery
 * - `prompts`: Prompt construction for translation requests
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, FailedItem, RunReport};
pub use self::core::{
    normalize_response, LogCapture, LogEntry, RetryPolicy, TranslationCapability, TranslationMap,
    TranslationService,
};
pub use self::prompts::{TranslationPromptBuilder, SYSTEM_PROMPT};

// Submodules
pub mod batch;
pub mod core;
pub mod prompts;
