/*!
 * Mock translation capabilities for testing.
 *
 * This module provides mock capabilities that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds, echoing each item
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::canned(..)` - Returns a fixed id -> translation table
 * - `MockTranslator::batch_failing(..)` - Fails multi-item calls so the
 *   per-item fallback path gets exercised
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::translation::core::{LogCapture, TranslationCapability, TranslationMap};
use crate::work_items::WorkItem;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, echoing each item text with a marker prefix
    Working,
    /// Always fails with a provider error
    Failing,
    /// Returns a fixed table; items absent from the table come back as
    /// explicit skips (`None`), items not in the table at all are omitted
    Canned(HashMap<u32, Option<String>>),
    /// Fails every call carrying more than one item; single-item calls fail
    /// only for the listed ids
    BatchFailing { failing_ids: Vec<u32> },
    /// Succeeds but strips placeholder-looking tokens from the echo, to
    /// trigger placeholder warnings downstream
    DroppingPlaceholders,
}

/// Mock capability for testing batch-translation behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls made, shared across clones
    call_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that echoes every item
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers from a fixed table
    pub fn canned(table: HashMap<u32, Option<String>>) -> Self {
        Self::new(MockBehavior::Canned(table))
    }

    /// Create a mock that rejects batches and fails the given ids per-item
    pub fn batch_failing(failing_ids: Vec<u32>) -> Self {
        Self::new(MockBehavior::BatchFailing { failing_ids })
    }

    /// Create a mock whose echoes lose placeholder tokens
    pub fn dropping_placeholders() -> Self {
        Self::new(MockBehavior::DroppingPlaceholders)
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn echo(item: &WorkItem) -> String {
        format!("[{}] {}", item.lang.code(), item.text)
    }

    fn strip_tokens(text: &str) -> String {
        text.chars()
            .filter(|c| !matches!(c, '%' | '{' | '}' | '<' | '>'))
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            call_count: Arc::clone(&self.call_count),
        }
    }
}

#[async_trait]
impl TranslationCapability for MockTranslator {
    async fn translate_items(
        &self,
        items: &[WorkItem],
        _log_capture: Option<&LogCapture>,
    ) -> Result<TranslationMap, TranslationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(items
                .iter()
                .map(|item| (item.id, Some(Self::echo(item))))
                .collect()),

            MockBehavior::Failing => Err(TranslationError::Provider(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            })),

            MockBehavior::Canned(table) => Ok(items
                .iter()
                .filter_map(|item| table.get(&item.id).map(|entry| (item.id, entry.clone())))
                .collect()),

            MockBehavior::BatchFailing { failing_ids } => {
                if items.len() > 1 {
                    return Err(TranslationError::malformed(
                        "Simulated undecodable batch response",
                    ));
                }
                match items.first() {
                    Some(item) if failing_ids.contains(&item.id) => {
                        Err(TranslationError::Provider(ProviderError::ApiError {
                            status_code: 503,
                            message: format!("Simulated failure for item {}", item.id),
                        }))
                    }
                    Some(item) => Ok(HashMap::from([(item.id, Some(Self::echo(item)))])),
                    None => Ok(HashMap::new()),
                }
            }

            MockBehavior::DroppingPlaceholders => Ok(items
                .iter()
                .map(|item| (item.id, Some(Self::strip_tokens(&item.text))))
                .collect()),
        }
    }
}
