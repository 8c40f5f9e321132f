//! Output writers.
//!
//! Two paths: the default merged writer (one `.md` per source PDF) and a
//! per-page writer that dumps each page as its own file, useful when
//! downstream tooling wants page granularity. Both create the output
//! folder on demand and overwrite existing files.

use crate::error::BatchError;
use crate::output::DocumentSet;
use std::path::{Path, PathBuf};

/// Write merged Markdown to `<dir>/<stem>.md`, returning the path.
///
/// Writes via a sibling temp file plus rename so a crash mid-write never
/// leaves a truncated `.md` behind; the rename also overwrites any
/// previous output for the same stem.
pub async fn write_merged(
    dir: impl AsRef<Path>,
    stem: &str,
    content: &str,
) -> Result<PathBuf, BatchError> {
    let dir = dir.as_ref();
    create_output_dir(dir).await?;

    let path = dir.join(format!("{stem}.md"));
    let tmp_path = path.with_extension("md.tmp");

    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(|e| BatchError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| BatchError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    Ok(path)
}

/// Write each page of `set` as `<dir>/document_<n>.md` (1-indexed).
///
/// No header-stripping is applied; pages go out verbatim.
pub async fn write_pages(
    dir: impl AsRef<Path>,
    set: &DocumentSet,
) -> Result<Vec<PathBuf>, BatchError> {
    let dir = dir.as_ref();
    create_output_dir(dir).await?;

    let mut written = Vec::with_capacity(set.pages.len());
    for (i, page) in set.pages.iter().enumerate() {
        let path = dir.join(format!("document_{}.md", i + 1));
        tokio::fs::write(&path, &page.text)
            .await
            .map_err(|e| BatchError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;
        written.push(path);
    }

    Ok(written)
}

async fn create_output_dir(dir: &Path) -> Result<(), BatchError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| BatchError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Document;

    #[tokio::test]
    async fn merged_write_round_trips_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("md");
        let content = "# 보고서\n\n본문 첫 단락 둘째 페이지 ";

        let path = write_merged(&out, "보고서_2024", content).await.unwrap();
        assert_eq!(path, out.join("보고서_2024.md"));

        let read_back = std::fs::read(&path).unwrap();
        assert_eq!(read_back, content.as_bytes());
    }

    #[tokio::test]
    async fn merged_write_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        write_merged(dir.path(), "doc", "old").await.unwrap();
        let path = write_merged(dir.path(), "doc", "new").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }

    #[tokio::test]
    async fn per_page_writer_numbers_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let set = DocumentSet::new(
            "doc",
            vec![Document::new("page one"), Document::new("page two")],
        );

        let written = write_pages(dir.path(), &set).await.unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("document_1.md"),
                dir.path().join("document_2.md")
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&written[1]).unwrap(),
            "page two" // verbatim: no trailing space, no stripping
        );
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_merged(dir.path(), "doc", "content").await.unwrap();
        assert!(!dir.path().join("doc.md.tmp").exists());
    }
}
