//! Input-folder scanning.
//!
//! Folder problems are not batch-fatal: a missing folder, a path that is
//! not a directory, or an unreadable directory all log a warning and yield
//! an empty list, so an unattended run simply has nothing to do rather
//! than aborting. Only the credential check (which happens before the
//! scan) can fail the batch outright.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Enumerate the PDF files in `folder`.
///
/// Entries are matched on a case-insensitive `.pdf` extension and
/// returned sorted by path, so batch order is deterministic across runs
/// and platforms. Subdirectories are not descended into.
pub fn scan_folder(folder: impl AsRef<Path>) -> Vec<PathBuf> {
    let folder = folder.as_ref();

    if !folder.exists() {
        warn!("input folder '{}' does not exist", folder.display());
        return Vec::new();
    }
    if !folder.is_dir() {
        warn!("'{}' is not a folder", folder.display());
        return Vec::new();
    }

    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot read folder '{}': {}", folder.display(), e);
            return Vec::new();
        }
    };

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();

    pdfs.sort();

    if pdfs.is_empty() {
        warn!("no PDF files in '{}'", folder.display());
    } else {
        info!("found {} PDF file(s) in '{}'", pdfs.len(), folder.display());
    }

    pdfs
}

/// Filename stem of a PDF path (no directory, no extension).
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_folder_yields_empty() {
        assert!(scan_folder("/definitely/not/a/real/folder").is_empty());
    }

    #[test]
    fn file_path_is_not_a_folder() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(scan_folder(&file).is_empty());
    }

    #[test]
    fn filters_and_sorts_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), "x").unwrap();
        fs::write(dir.path().join("A.PDF"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("c.pdf.bak"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = scan_folder(dir.path());
        let names: Vec<String> = found.iter().map(|p| file_stem(p)).collect();
        assert_eq!(names, vec!["A", "b"]);
    }

    #[test]
    fn empty_folder_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_folder(dir.path()).is_empty());
    }

    #[test]
    fn stem_strips_extension_only() {
        assert_eq!(file_stem(Path::new("data/2024.report.pdf")), "2024.report");
    }
}
