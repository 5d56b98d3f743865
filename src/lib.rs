/*!
 * # poglot - PO catalog translation with AI
 *
 * A Rust library for batch-translating gettext PO catalogs using an
 * OpenAI-compatible API.
 *
 * ## Features
 *
 * - Parse and write gettext PO catalogs, preserving everything but `msgstr`
 * - Detect per-entry source language (English or German) heuristically
 * - Translate in batches with per-item recovery when a batch fails
 * - Audit translations for lost placeholders (printf, braces, markup, URLs)
 * - Configurable model, batch size, target language, and retry policy
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: PO catalog loading, projection, and persistence
 * - `work_items`: Worklist selection from catalog entries
 * - `translation`: AI-powered translation:
 *   - `translation::core`: Capability trait, retry policy, response decoding
 *   - `translation::batch`: Batch driving with failure recovery
 *   - `translation::prompts`: Prompt construction
 * - `validation`: Placeholder auditing of accepted translations
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Source-language heuristics
 * - `providers`: OpenAI API client and test mocks
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;
pub mod validation;
pub mod work_items;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use catalog::{CatalogDocument, CatalogEntry};
pub use errors::{AppError, ProviderError, TranslationError};
pub use translation::{BatchTranslator, RunReport, TranslationService};
pub use work_items::{build_work_items, WorkItem, WorkItemSet};
