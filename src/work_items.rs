/*!
 * Work-item selection for a translation run.
 *
 * Scans the projected catalog entries and decides, per entry, whether it
 * needs translation, which field is the source text, and which source
 * language to tag it with. The result is an ordered list of work items with
 * dense ids plus a lookup that joins accepted translations back to catalog
 * entry indices.
 */

use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::app_config::SourceLanguageMode;
use crate::catalog::CatalogEntry;
use crate::language_utils::{self, SourceLanguage};

/// Which field of the catalog entry supplied the text to translate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceField {
    /// The original-language source text
    Msgid,
    /// The entry's existing translation (re-translation)
    Msgstr,
}

impl std::fmt::Display for SourceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceField::Msgid => write!(f, "msgid"),
            SourceField::Msgstr => write!(f, "msgstr"),
        }
    }
}

/// One queued translation task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Dense id starting at 1, in catalog scan order; the join key back to
    /// the origin lookup and the id sent to the model
    pub id: u32,
    /// The literal text to translate
    pub text: String,
    /// Advisory source-language hint for the model, never a gate
    pub lang: SourceLanguage,
}

/// Where a work item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItemOrigin {
    /// Index of the catalog entry the item was built from
    pub entry_index: usize,
    /// Which field of that entry supplied the text
    pub field: SourceField,
}

/// The full worklist for one run
#[derive(Debug, Default)]
pub struct WorkItemSet {
    /// Ordered work items
    pub items: Vec<WorkItem>,
    /// id -> origin lookup
    origins: BTreeMap<u32, WorkItemOrigin>,
    /// Non-header entries scanned (header/empty-msgid entries excluded)
    pub total_entries: usize,
}

impl WorkItemSet {
    /// Number of queued items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing was queued
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Origin of a work item, if the id was issued in this run
    pub fn origin(&self, id: u32) -> Option<&WorkItemOrigin> {
        self.origins.get(&id)
    }

    /// Resolve accepted translations (id -> text) to catalog entry updates
    /// (entry index -> text). Ids that were never issued are dropped.
    pub fn entry_updates(&self, translations: &BTreeMap<u32, String>) -> BTreeMap<usize, String> {
        translations
            .iter()
            .filter_map(|(id, text)| {
                self.origins
                    .get(id)
                    .map(|origin| (origin.entry_index, text.clone()))
            })
            .collect()
    }
}

/// Build the worklist for a run.
///
/// Selection policy, per entry, in priority order:
/// - `force_all`: prefer the existing translation if non-empty, else the
///   source text; heuristics are ignored entirely.
/// - mode `en`: existing translation if non-empty and English-looking, else
///   the source text if English-looking, else skip the entry.
/// - mode `de`: always the source text.
/// - mode `auto`: existing translation if non-empty and English-looking,
///   else the source text if German-looking, else whichever of the two is
///   non-empty (translation first) so every entry with text is attempted.
///
/// Entries with an empty msgid (the header) are neither queued nor counted.
/// Empty chosen text never produces an item.
pub fn build_work_items(
    entries: &[CatalogEntry],
    mode: SourceLanguageMode,
    force_all: bool,
) -> WorkItemSet {
    let mut set = WorkItemSet::default();
    let mut id_counter: u32 = 0;

    for entry in entries {
        if entry.msgid.is_empty() {
            continue;
        }

        set.total_entries += 1;

        let selection: Option<(&str, SourceField)> = if force_all {
            if !entry.msgstr.is_empty() {
                Some((&entry.msgstr, SourceField::Msgstr))
            } else {
                Some((&entry.msgid, SourceField::Msgid))
            }
        } else {
            match mode {
                SourceLanguageMode::En => {
                    if !entry.msgstr.is_empty() && language_utils::looks_english(&entry.msgstr) {
                        Some((&entry.msgstr, SourceField::Msgstr))
                    } else if language_utils::looks_english(&entry.msgid) {
                        Some((&entry.msgid, SourceField::Msgid))
                    } else {
                        None
                    }
                }
                SourceLanguageMode::De => Some((&entry.msgid, SourceField::Msgid)),
                SourceLanguageMode::Auto => {
                    if !entry.msgstr.is_empty() && language_utils::looks_english(&entry.msgstr) {
                        Some((&entry.msgstr, SourceField::Msgstr))
                    } else if language_utils::looks_german(&entry.msgid) {
                        Some((&entry.msgid, SourceField::Msgid))
                    } else if !entry.msgstr.is_empty() {
                        // Last resort: a non-empty translation that matched
                        // neither heuristic is still assumed to be the
                        // desired source text.
                        Some((&entry.msgstr, SourceField::Msgstr))
                    } else {
                        Some((&entry.msgid, SourceField::Msgid))
                    }
                }
            }
        };

        let Some((text, field)) = selection else {
            continue;
        };

        if text.is_empty() {
            continue;
        }

        id_counter += 1;
        set.items.push(WorkItem {
            id: id_counter,
            text: text.to_string(),
            lang: language_utils::detect_source_language(text),
        });
        set.origins.insert(
            id_counter,
            WorkItemOrigin {
                entry_index: entry.index,
                field,
            },
        );
    }

    debug!(
        "Built {} work item(s) from {} scanned entr(ies)",
        set.items.len(),
        set.total_entries
    );

    set
}
