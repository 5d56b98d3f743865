/*!
 * PO catalog loading, projection, and persistence.
 *
 * Wraps `polib` so the rest of the pipeline works with a flat projection of
 * singular entries. The underlying catalog keeps comments, contexts, source
 * references, and the header untouched; the only field this module ever
 * writes is `msgstr`.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use polib::catalog::Catalog;
use polib::message::{MessageMutView, MessageView};
use polib::po_file;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// Header keys `polib` insists on. A catalog missing any of these aborts the
/// parser instead of returning an error, so the load path checks them first.
const REQUIRED_HEADER_KEYS: [&str; 9] = [
    "Project-Id-Version",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Language",
    "Plural-Forms",
];

/// Flat projection of one translatable catalog entry.
///
/// `index` is the position of the message within the catalog and is the join
/// key used when accepted translations are written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Position in the catalog message list
    pub index: usize,
    /// Original-language source text
    pub msgid: String,
    /// Current translation, may be empty
    pub msgstr: String,
    /// Disambiguating context, if any
    pub msgctxt: Option<String>,
}

/// An in-memory PO catalog with its source path.
pub struct CatalogDocument {
    catalog: Catalog,
    path: PathBuf,
}

impl std::fmt::Debug for CatalogDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDocument")
            .field("path", &self.path)
            .field("messages", &self.catalog.count())
            .finish()
    }
}

impl CatalogDocument {
    /// Load a PO catalog from disk. Parse failures are fatal to the run.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        validate_header(&FileManager::read_to_string(path)?)
            .with_context(|| format!("Failed to parse PO file {:?}", path))?;
        let catalog = po_file::parse(path)
            .with_context(|| format!("Failed to parse PO file {:?}", path))?;
        info!("Loaded catalog with {} messages from {:?}", catalog.count(), path);
        Ok(Self {
            catalog,
            path: path.to_path_buf(),
        })
    }

    /// Path the catalog was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of messages in the catalog (header excluded)
    pub fn message_count(&self) -> usize {
        self.catalog.count()
    }

    /// Project the singular messages into flat entries.
    ///
    /// Plural messages are skipped: the pipeline models exactly one
    /// translation field per entry.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries = Vec::with_capacity(self.catalog.count());
        for (index, message) in self.catalog.messages().enumerate() {
            if message.is_plural() {
                debug!(
                    "Skipping plural message at index {}: {:?}",
                    index,
                    message.msgid()
                );
                continue;
            }
            entries.push(CatalogEntry {
                index,
                msgid: message.msgid().to_string(),
                msgstr: message.msgstr().unwrap_or_default().to_string(),
                msgctxt: (!message.msgctxt().is_empty())
                    .then(|| message.msgctxt().to_string()),
            });
        }
        entries
    }

    /// Write accepted translations back into the catalog.
    ///
    /// `updates` maps entry index to the translation text. Only `msgstr` is
    /// touched; everything else passes through unchanged. Returns the number
    /// of messages updated.
    pub fn apply_translations(&mut self, updates: &BTreeMap<usize, String>) -> Result<usize> {
        let mut applied = 0;
        for (index, mut message) in self.catalog.messages_mut().enumerate() {
            if let Some(translation) = updates.get(&index) {
                let slot = message
                    .msgstr_mut()
                    .map_err(|e| anyhow!("Cannot update plural message at index {}: {:?}", index, e))?;
                *slot = translation.clone();
                applied += 1;
            }
        }
        debug!("Applied {} translation(s) to catalog", applied);
        Ok(applied)
    }

    /// Serialize the full catalog to `path` as UTF-8, creating parent
    /// directories if needed. Persist failures are fatal to the run.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            FileManager::ensure_dir(parent)?;
        }
        po_file::write(&self.catalog, path)
            .with_context(|| format!("Failed to write PO file {:?}", path))?;
        info!("Wrote catalog to {:?}", path);
        Ok(())
    }
}

/// Check the raw file content for the header keys the parser cannot cope
/// without. A cheap textual pre-check: the keys live in the header msgstr,
/// and a key present anywhere else would be a degenerate catalog anyway.
fn validate_header(content: &str) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_HEADER_KEYS
        .iter()
        .copied()
        .filter(|key| !content.contains(&format!("{}:", key)))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "catalog header is missing required key(s): {}",
            missing.join(", ")
        ))
    }
}
