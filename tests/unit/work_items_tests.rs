/*!
 * Tests for worklist selection policy
 */

use std::collections::BTreeMap;

use poglot::app_config::SourceLanguageMode;
use poglot::catalog::CatalogEntry;
use poglot::language_utils::SourceLanguage;
use poglot::work_items::{build_work_items, SourceField};

fn entry(index: usize, msgid: &str, msgstr: &str) -> CatalogEntry {
    CatalogEntry {
        index,
        msgid: msgid.to_string(),
        msgstr: msgstr.to_string(),
        msgctxt: None,
    }
}

/// Ids are dense, start at 1, and follow catalog order
#[test]
fn test_build_work_items_shouldAssignDenseIdsInOrder() {
    let entries = vec![
        entry(0, "Accept All", ""),
        entry(1, "Cookie Settings", ""),
        entry(2, "Save changes", ""),
    ];

    let work = build_work_items(&entries, SourceLanguageMode::Auto, false);

    let ids: Vec<u32> = work.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(work.total_entries, 3);
}

/// Auto mode prefers an English-looking msgstr over the msgid
#[test]
fn test_build_work_items_autoMode_shouldPreferEnglishMsgstr() {
    let entries = vec![entry(0, "Einstellungen für Cookies", "Cookie Settings")];

    let work = build_work_items(&entries, SourceLanguageMode::Auto, false);

    assert_eq!(work.len(), 1);
    assert_eq!(work.items[0].text, "Cookie Settings");
    assert_eq!(work.items[0].lang, SourceLanguage::En);
    assert_eq!(work.origin(1).unwrap().field, SourceField::Msgstr);
}

/// Auto mode takes the msgid when it looks German
#[test]
fn test_build_work_items_autoMode_shouldTakeGermanMsgid() {
    let entries = vec![entry(0, "Größe wählen", "")];

    let work = build_work_items(&entries, SourceLanguageMode::Auto, false);

    assert_eq!(work.len(), 1);
    assert_eq!(work.items[0].text, "Größe wählen");
    assert_eq!(work.items[0].lang, SourceLanguage::De);
    assert_eq!(work.origin(1).unwrap().field, SourceField::Msgid);
}

/// Auto mode still queues entries that match neither heuristic
#[test]
fn test_build_work_items_autoMode_shouldFallBackToNonEmptyText() {
    let entries = vec![
        // Neither heuristic fires; the non-empty msgstr is taken
        entry(0, "xyzzy", "plugh"),
        // Neither fires and msgstr is empty; the msgid is taken
        entry(1, "xyzzy", ""),
    ];

    let work = build_work_items(&entries, SourceLanguageMode::Auto, false);

    assert_eq!(work.len(), 2);
    assert_eq!(work.items[0].text, "plugh");
    assert_eq!(work.origin(1).unwrap().field, SourceField::Msgstr);
    assert_eq!(work.items[1].text, "xyzzy");
    assert_eq!(work.origin(2).unwrap().field, SourceField::Msgid);
}

/// English mode skips entries with no English-looking text
#[test]
fn test_build_work_items_enMode_shouldSkipNonEnglishEntries() {
    let entries = vec![
        entry(0, "Accept All", ""),
        entry(1, "Größe wählen", ""),
        entry(2, "Drucken", "Print settings"),
    ];

    let work = build_work_items(&entries, SourceLanguageMode::En, false);

    assert_eq!(work.len(), 2);
    assert_eq!(work.items[0].text, "Accept All");
    assert_eq!(work.items[1].text, "Print settings");
    // Skipped entries still count as scanned
    assert_eq!(work.total_entries, 3);
}

/// German mode always takes the msgid, no heuristics involved
#[test]
fn test_build_work_items_deMode_shouldAlwaysTakeMsgid() {
    let entries = vec![
        entry(0, "Accept All", "whatever"),
        entry(1, "Drucken", ""),
    ];

    let work = build_work_items(&entries, SourceLanguageMode::De, false);

    assert_eq!(work.len(), 2);
    assert_eq!(work.items[0].text, "Accept All");
    assert_eq!(work.origin(1).unwrap().field, SourceField::Msgid);
    assert_eq!(work.items[1].text, "Drucken");
}

/// Force mode re-translates existing translations and ignores heuristics
#[test]
fn test_build_work_items_forceAll_shouldPreferExistingTranslation() {
    let entries = vec![
        entry(0, "Accept All", "Godta alle"),
        entry(1, "xyzzy", ""),
    ];

    let work = build_work_items(&entries, SourceLanguageMode::Auto, true);

    assert_eq!(work.len(), 2);
    assert_eq!(work.items[0].text, "Godta alle");
    assert_eq!(work.origin(1).unwrap().field, SourceField::Msgstr);
    assert_eq!(work.items[1].text, "xyzzy");
    assert_eq!(work.origin(2).unwrap().field, SourceField::Msgid);
}

/// Header-style entries with an empty msgid are neither queued nor counted
#[test]
fn test_build_work_items_withEmptyMsgid_shouldSkipAndNotCount() {
    let entries = vec![entry(0, "", "irrelevant"), entry(1, "Accept All", "")];

    let work = build_work_items(&entries, SourceLanguageMode::Auto, false);

    assert_eq!(work.len(), 1);
    assert_eq!(work.total_entries, 1);
    assert_eq!(work.origin(1).unwrap().entry_index, 1);
}

/// Accepted translations resolve back to catalog entry indices
#[test]
fn test_entry_updates_shouldJoinOnOriginAndDropUnknownIds() {
    let entries = vec![
        entry(3, "Accept All", ""),
        entry(7, "Cookie Settings", ""),
    ];
    let work = build_work_items(&entries, SourceLanguageMode::Auto, false);

    let mut translations = BTreeMap::new();
    translations.insert(1, "Godta alle".to_string());
    translations.insert(99, "never issued".to_string());

    let updates = work.entry_updates(&translations);

    assert_eq!(updates.len(), 1);
    assert_eq!(updates.get(&3).map(String::as_str), Some("Godta alle"));
}
