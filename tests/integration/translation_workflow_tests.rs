/*!
 * End-to-end catalog translation tests using mock capabilities
 */

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

use poglot::app_config::Config;
use poglot::app_controller::{issues_log_path, Controller};
use poglot::catalog::CatalogDocument;
use poglot::providers::mock::MockTranslator;
use poglot::work_items::{build_work_items, WorkItemSet};

use crate::common;

/// Load the shared fixture and build its worklist with the given config
fn load_fixture(dir: &PathBuf, config: &Config) -> Result<(CatalogDocument, WorkItemSet, PathBuf)> {
    let po_path = common::create_test_po(dir, "messages.po")?;
    let document = CatalogDocument::load(&po_path)?;
    let entries = document.entries();
    let work = build_work_items(&entries, config.source_language, config.force_all);
    Ok((document, work, po_path))
}

/// Full pipeline: load, translate with canned answers, write back, reload
#[tokio::test]
async fn test_workflow_withCannedAnswers_shouldWriteTranslationsBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let config = Config::default();
    let controller = Controller::with_config(config.clone())?;

    let (document, work, _) = load_fixture(&dir, &config)?;
    assert_eq!(work.len(), 4);

    let table = HashMap::from([
        (1, Some("Godta alle".to_string())),
        (2, Some("Innstillinger for informasjonskapsler".to_string())),
        (3, Some("Hei %s, velkommen tilbake".to_string())),
        // The model explicitly skips the last item
        (4, None),
    ]);
    let output_path = dir.join("messages.nb.po");

    let report = controller
        .run_with_capability(
            MockTranslator::canned(table),
            document,
            work,
            output_path.clone(),
        )
        .await?;

    assert_eq!(report.translated_count(), 3);
    assert_eq!(report.total_entries, 4);
    assert!(report.failed.is_empty());
    assert!(report.placeholder_warnings.is_empty());
    assert_eq!(report.output_path.as_deref(), Some(output_path.as_path()));

    let reloaded = CatalogDocument::load(&output_path)?;
    let entries = reloaded.entries();
    assert_eq!(entries[0].msgstr, "Godta alle");
    assert_eq!(entries[1].msgstr, "Innstillinger for informasjonskapsler");
    assert_eq!(entries[2].msgstr, "Hei %s, velkommen tilbake");
    // The skipped entry keeps its empty msgstr
    assert_eq!(entries[3].msgstr, "");

    // A clean run leaves no issues log behind
    assert!(!issues_log_path(&output_path).exists());
    Ok(())
}

/// A failed batch falls back to per-item calls; the stubborn item ends up in
/// the report and the issues log, everything else is still written
#[tokio::test]
async fn test_workflow_withBatchFailure_shouldRecoverAndLogIssues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let config = Config::default();
    let controller = Controller::with_config(config.clone())?;

    let (document, work, _) = load_fixture(&dir, &config)?;
    let output_path = dir.join("messages.nb.po");

    let report = controller
        .run_with_capability(
            MockTranslator::batch_failing(vec![2]),
            document,
            work,
            output_path.clone(),
        )
        .await?;

    assert_eq!(report.translated_count(), 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, 2);
    assert_eq!(report.failed[0].text, "Cookie Settings");

    // Accepted items were written despite the failure
    let reloaded = CatalogDocument::load(&output_path)?;
    let entries = reloaded.entries();
    assert_eq!(entries[0].msgstr, "[en] Accept All");
    assert_eq!(entries[1].msgstr, "");

    // The issues log names the failed item
    let log_path = issues_log_path(&output_path);
    assert!(log_path.exists());
    let log_content = std::fs::read_to_string(&log_path)?;
    assert!(log_content.contains("Failed items:"));
    assert!(log_content.contains("Cookie Settings"));
    Ok(())
}

/// Lost placeholders produce warnings and an issues log but never block the
/// translation from being written
#[tokio::test]
async fn test_workflow_withLostPlaceholders_shouldWarnAndStillWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let config = Config::default();
    let controller = Controller::with_config(config.clone())?;

    let (document, work, _) = load_fixture(&dir, &config)?;
    let output_path = dir.join("messages.nb.po");

    let table = HashMap::from([
        (1, Some("Godta alle".to_string())),
        (2, Some("Innstillinger".to_string())),
        // Translation for "Hello %s, welcome back" drops the %s
        (3, Some("Hei, velkommen tilbake".to_string())),
        (4, Some("Lagre innstillinger".to_string())),
    ]);

    let report = controller
        .run_with_capability(MockTranslator::canned(table), document, work, output_path.clone())
        .await?;

    assert_eq!(report.translated_count(), 4);
    assert_eq!(report.placeholder_warnings.len(), 1);
    assert_eq!(report.placeholder_warnings[0].id, 3);
    assert_eq!(report.placeholder_warnings[0].missing, vec!["%s"]);

    // The flagged translation is accepted anyway
    let reloaded = CatalogDocument::load(&output_path)?;
    assert_eq!(reloaded.entries()[2].msgstr, "Hei, velkommen tilbake");

    let log_path = issues_log_path(&output_path);
    assert!(log_path.exists());
    let log_content = std::fs::read_to_string(&log_path)?;
    assert!(log_content.contains("Placeholder warnings:"));
    assert!(log_content.contains("%s"));
    Ok(())
}

/// An empty worklist still writes the output catalog unchanged
#[tokio::test]
async fn test_workflow_withEmptyWorklist_shouldStillWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let config = Config::default();
    let controller = Controller::with_config(config.clone())?;

    let po_path = common::create_test_po(&dir, "messages.po")?;
    let document = CatalogDocument::load(&po_path)?;
    let output_path = dir.join("messages.nb.po");

    let report = controller
        .run_with_capability(
            MockTranslator::working(),
            document,
            WorkItemSet::default(),
            output_path.clone(),
        )
        .await?;

    assert_eq!(report.translated_count(), 0);
    assert!(output_path.exists());
    // No call ever reached the capability
    Ok(())
}
