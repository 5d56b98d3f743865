use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::app_config::Config;
use crate::catalog::CatalogDocument;
use crate::file_utils::FileManager;
use crate::translation::core::{LogCapture, LogEntry, TranslationCapability};
use crate::translation::{BatchTranslator, RunReport, TranslationService};
use crate::work_items::{build_work_items, WorkItemSet};

// @module: Application controller for catalog translation runs

/// How many work items a dry run prints before summarizing the rest
const DRY_RUN_PREVIEW_LIMIT: usize = 100;

/// Main application controller for PO catalog translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Preview the worklist without calling the API or writing anything.
    ///
    /// Prints up to the first 100 queued items with their id, detected
    /// language, source field, and text, then a summary line.
    pub async fn dry_run(&self, input_file: PathBuf) -> Result<()> {
        let (_, work) = self.load_worklist(&input_file)?;

        info!(
            "Dry run: {} of {} entr(ies) would be translated to {}",
            work.len(),
            work.total_entries,
            self.config.target_language.display_name()
        );

        for item in work.items.iter().take(DRY_RUN_PREVIEW_LIMIT) {
            let field = work
                .origin(item.id)
                .map(|origin| origin.field.to_string())
                .unwrap_or_default();
            info!(
                "  #{} [{}/{}] {}",
                item.id,
                item.lang.code(),
                field,
                truncate_text(&item.text, 80)
            );
        }

        if work.len() > DRY_RUN_PREVIEW_LIMIT {
            info!("  … and {} more", work.len() - DRY_RUN_PREVIEW_LIMIT);
        }

        Ok(())
    }

    /// Run the full translation workflow.
    ///
    /// Loads the catalog, builds the worklist, probes the API connection,
    /// translates in batches, writes the updated catalog to `output_file`,
    /// and leaves an issues log next to it when anything went wrong.
    pub async fn run(&self, input_file: PathBuf, output_file: PathBuf) -> Result<RunReport> {
        let (document, work) = self.load_worklist(&input_file)?;

        let api_key = self.config.ensure_api_key()?;
        let service = TranslationService::new(&self.config, api_key);

        // Fail fast on a bad key or endpoint, before any catalog mutation.
        service
            .test_connection()
            .await
            .context("Connection test failed")?;
        debug!("Connection test passed");

        self.run_with_capability(service, document, work, output_file)
            .await
    }

    /// Drive the batch translation with any capability.
    ///
    /// Split out from `run` so tests can inject a mock capability and still
    /// exercise the apply/save/report path.
    pub async fn run_with_capability<C: TranslationCapability>(
        &self,
        capability: C,
        mut document: CatalogDocument,
        work: WorkItemSet,
        output_file: PathBuf,
    ) -> Result<RunReport> {
        let start_time = std::time::Instant::now();

        info!(
            "🚀 poglot: {} -> {} ({} item(s) queued)",
            self.config.provider.model,
            self.config.target_language.display_name(),
            work.len()
        );

        let progress_bar = ProgressBar::new(work.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        // Capture warnings during translation so they don't break the bar.
        let log_capture: LogCapture = Arc::new(Mutex::new(Vec::new()));

        let translator = BatchTranslator::new(capability, self.config.batch_size);
        let pb = progress_bar.clone();
        let mut report = translator
            .run(&work.items, Some(&log_capture), move |done, _total| {
                pb.set_position(done as u64);
            })
            .await?;
        report.total_entries = work.total_entries;

        progress_bar.finish_and_clear();

        // Write back whatever was accepted, even on a run with failures.
        let updates = work.entry_updates(&report.translations);
        let applied = document.apply_translations(&updates)?;
        document.save(&output_file)?;
        report.output_path = Some(output_file.clone());

        let logs = {
            let guard = log_capture.lock().await;
            guard.clone()
        };
        self.report_outcome(&report, &logs, &output_file);

        info!(
            "Translated {} of {} queued item(s), {} message(s) updated, in {}",
            report.translated_count(),
            report.total_queued,
            applied,
            format_duration(start_time.elapsed())
        );

        Ok(report)
    }

    /// Load the catalog and build the worklist for the configured run
    fn load_worklist(&self, input_file: &Path) -> Result<(CatalogDocument, WorkItemSet)> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let document = CatalogDocument::load(input_file)?;
        let entries = document.entries();
        let work = build_work_items(&entries, self.config.source_language, self.config.force_all);

        info!(
            "Queued {} of {} entr(ies) for translation",
            work.len(),
            work.total_entries
        );

        Ok((document, work))
    }

    /// Log warnings and failures, and write the issues log when needed
    fn report_outcome(&self, report: &RunReport, logs: &[LogEntry], output_file: &Path) {
        for warning in &report.placeholder_warnings {
            warn!(
                "Item {} lost placeholder(s) {:?}: {:?} -> {:?}",
                warning.id, warning.missing, warning.source, warning.translation
            );
        }
        for failed in &report.failed {
            error!("Item {} failed: {}", failed.id, failed.error);
        }

        let has_captured_issues = logs
            .iter()
            .any(|entry| entry.level == "WARN" || entry.level == "ERROR");
        if !report.has_issues() && !has_captured_issues {
            return;
        }

        let log_path = issues_log_path(output_file);
        match self.write_issues_log(report, logs, &log_path) {
            Ok(()) => info!("Issues written to {}", log_path.display()),
            Err(e) => warn!("Failed to write issues log: {}", e),
        }
    }

    /// Serialize the run's issues to the log file
    fn write_issues_log(
        &self,
        report: &RunReport,
        logs: &[LogEntry],
        log_path: &Path,
    ) -> Result<()> {
        let mut content = String::new();

        content.push_str(&format!(
            "Translation Log - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        content.push_str(&format!(
            "Context: {} -> {}\n\n",
            self.config.provider.model,
            self.config.target_language.display_name()
        ));

        for entry in logs {
            content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        if !report.placeholder_warnings.is_empty() {
            content.push_str("\nPlaceholder warnings:\n");
            for warning in &report.placeholder_warnings {
                let line = serde_json::to_string(warning).unwrap_or_default();
                content.push_str(&format!("{}\n", line));
            }
        }

        if !report.failed.is_empty() {
            content.push_str("\nFailed items:\n");
            for failed in &report.failed {
                let line = serde_json::to_string(failed).unwrap_or_default();
                content.push_str(&format!("{}\n", line));
            }
        }

        FileManager::write_to_file(log_path, &content)
    }
}

/// Issues log path for a given output file: `out.po` -> `out.issues.log`
pub fn issues_log_path(output_file: &Path) -> PathBuf {
    output_file.with_extension("issues.log")
}

/// Shorten preview text to at most `max` characters
fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let shortened: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", shortened)
}

// Format duration in a human-readable format
fn format_duration(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
