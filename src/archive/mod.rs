//! Result archive handling.
//!
//! OCR results come back packaged as a zip archive of text entries. This
//! module extracts the entries into a caller-owned directory and
//! concatenates their contents in archive order for parsing. Entries that
//! do not decode as UTF-8 are skipped rather than aborting the archive.

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use thiserror::Error;
use zip::ZipArchive;

/// Errors from result archive processing.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("not a valid result archive: {0}")]
    Corrupt(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract all entries of `archive_bytes` into `dest_dir` and return their
/// combined textual content, newline-separated, in archive-entry order.
///
/// `dest_dir` is owned by the caller; cleanup is the caller's concern.
/// Directory entries, `__MACOSX` metadata, and hidden files are skipped.
pub fn read_archive(archive_bytes: &[u8], dest_dir: &Path) -> Result<String, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut combined = String::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let entry_path = entry.name().to_string();

        if entry.is_dir() || entry_path.starts_with("__MACOSX") {
            continue;
        }

        let filename = sanitize_entry_name(&entry_path);
        if filename.is_empty() {
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;

        let out_path = dest_dir.join(&filename);
        File::create(&out_path)?.write_all(&bytes)?;

        match String::from_utf8(bytes) {
            Ok(text) => {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(&text);
            }
            Err(_) => {
                tracing::warn!(entry = %entry_path, "skipping undecodable archive entry");
            }
        }
    }

    Ok(combined)
}

/// Sanitize an archive entry name for extraction, preventing path traversal.
fn sanitize_entry_name(entry_path: &str) -> String {
    entry_path
        .rsplit('/')
        .next()
        .unwrap_or(entry_path)
        .replace('\\', "_")
        .replace("..", "_")
        .trim_start_matches('.')
        .to_string()
}
