/*!
 * Batch translation driving.
 *
 * This module walks the worklist in batches, accepts whatever the capability
 * answers, and recovers from batch failures by retrying the members one at a
 * time. Failures never abort the run; they are recorded and reported.
 */

use anyhow::{anyhow, Result};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::validation::placeholders::{PlaceholderValidator, PlaceholderWarning};
use crate::work_items::WorkItem;

use super::core::{LogCapture, LogEntry, TranslationCapability};

/// One work item that could not be translated even per-item
#[derive(Debug, Clone, Serialize)]
pub struct FailedItem {
    /// Work-item id
    pub id: u32,
    /// The text that was sent
    pub text: String,
    /// Final error, after batch and per-item attempts
    pub error: String,
}

/// Everything a completed run produced
#[derive(Debug, Default)]
pub struct RunReport {
    /// Entries scanned in the catalog (header excluded)
    pub total_entries: usize,
    /// Work items that were queued
    pub total_queued: usize,
    /// Accepted translations, work-item id -> text
    pub translations: BTreeMap<u32, String>,
    /// Advisory placeholder-loss warnings
    pub placeholder_warnings: Vec<PlaceholderWarning>,
    /// Items that failed both the batch and the per-item fallback
    pub failed: Vec<FailedItem>,
    /// Where the catalog was written, when it was
    pub output_path: Option<PathBuf>,
}

impl RunReport {
    /// Number of accepted translations
    pub fn translated_count(&self) -> usize {
        self.translations.len()
    }

    /// True when warnings or failures need to land in the issues log
    pub fn has_issues(&self) -> bool {
        !self.placeholder_warnings.is_empty() || !self.failed.is_empty()
    }
}

/// Batch driver over any translation capability
pub struct BatchTranslator<C: TranslationCapability> {
    /// The capability performing the calls
    capability: C,
    /// Items per call
    batch_size: usize,
}

impl<C: TranslationCapability> BatchTranslator<C> {
    /// Create a new batch translator
    pub fn new(capability: C, batch_size: usize) -> Self {
        Self {
            capability,
            batch_size,
        }
    }

    /// Capability accessor, mainly for tests
    pub fn capability(&self) -> &C {
        &self.capability
    }

    /// Run the worklist to completion.
    ///
    /// Batches are processed in order. A successful call contributes its
    /// answers: ids the model answered with text are accepted (after a
    /// placeholder audit), ids it skipped or never mentioned leave their
    /// entries untouched. A failed call falls back to one call per member;
    /// members that still fail are recorded in the report.
    ///
    /// `on_progress` is called after every batch with the accepted count so
    /// far and the total queued.
    pub async fn run(
        &self,
        items: &[WorkItem],
        log_capture: Option<&LogCapture>,
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<RunReport> {
        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        let mut report = RunReport {
            total_queued: items.len(),
            ..RunReport::default()
        };

        for batch in items.chunks(self.batch_size) {
            match self.capability.translate_items(batch, log_capture).await {
                Ok(map) => {
                    for item in batch {
                        if let Some(Some(translation)) = map.get(&item.id) {
                            self.accept(item, translation, &mut report);
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Batch of {} item(s) failed, retrying per item: {}",
                        batch.len(),
                        e
                    );
                    if let Some(log) = log_capture {
                        log.lock().await.push(LogEntry {
                            level: "WARN".to_string(),
                            message: format!("Batch of {} item(s) failed: {}", batch.len(), e),
                        });
                    }
                    self.recover_per_item(batch, log_capture, &mut report).await;
                }
            }

            on_progress(report.translated_count(), items.len());
        }

        Ok(report)
    }

    /// Accept one translation: audit placeholders, record the text
    fn accept(&self, item: &WorkItem, translation: &str, report: &mut RunReport) {
        if let Some(warning) = PlaceholderValidator::audit(item.id, &item.text, translation) {
            report.placeholder_warnings.push(warning);
        }
        report.translations.insert(item.id, translation.to_string());
    }

    /// Per-item fallback after a failed batch call
    async fn recover_per_item(
        &self,
        batch: &[WorkItem],
        log_capture: Option<&LogCapture>,
        report: &mut RunReport,
    ) {
        for item in batch {
            match self
                .capability
                .translate_items(std::slice::from_ref(item), log_capture)
                .await
            {
                Ok(map) => {
                    if let Some(Some(translation)) = map.get(&item.id) {
                        self.accept(item, translation, report);
                    }
                }
                Err(e) => {
                    if let Some(log) = log_capture {
                        log.lock().await.push(LogEntry {
                            level: "ERROR".to_string(),
                            message: format!("Item {} failed after retries: {}", item.id, e),
                        });
                    }
                    report.failed.push(FailedItem {
                        id: item.id,
                        text: item.text.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}
