/*!
 * Common test utilities for the poglot test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample PO catalog for testing.
///
/// The catalog carries a header plus four singular entries: two untranslated
/// English entries, one with a placeholder, and one German entry.
pub fn create_test_po(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"msgid ""
msgstr ""
"Project-Id-Version: test 1.0\n"
"POT-Creation-Date: 2024-01-01 00:00+0000\n"
"PO-Revision-Date: 2024-01-01 00:00+0000\n"
"Last-Translator: test\n"
"Language-Team: test\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"
"Language: nb\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

msgid "Accept All"
msgstr ""

msgid "Cookie Settings"
msgstr ""

msgid "Hello %s, welcome back"
msgstr ""

msgid "Einstellungen speichern"
msgstr ""
"#;
    create_test_file(dir, filename, content)
}
