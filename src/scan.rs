//! Folder scan: supported images and their extracted caption metadata.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::metadata;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extensions the batch driver picks up, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff", "png"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// One row of the scan result shown in the GUI's file table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageRow {
    pub filename: String,
    /// `YYYY-MM-DD` or empty when the file carries no usable date.
    pub capture_date: String,
    /// XMP `dc:title` or empty.
    pub title: String,
}

/// Supported image files directly inside `dir`, sorted by filename.
/// Subdirectories are not descended into.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    let files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported(path))
        .collect();
    Ok(files)
}

/// Scan a folder into table rows: filename, capture date, title.
pub fn scan_folder(dir: &Path) -> Result<Vec<ImageRow>, ScanError> {
    let rows = list_images(dir)?
        .into_iter()
        .map(|path| ImageRow {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            capture_date: metadata::capture_date(&path).unwrap_or_default(),
            title: metadata::xmp_title(&path).unwrap_or_default(),
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_jpeg_with_date, write_test_image};
    use tempfile::TempDir;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported(Path::new("a.jpg")));
        assert!(is_supported(Path::new("a.JPEG")));
        assert!(is_supported(Path::new("a.Tif")));
        assert!(is_supported(Path::new("a.png")));
        assert!(!is_supported(Path::new("a.gif")));
        assert!(!is_supported(Path::new("a.xmp")));
        assert!(!is_supported(Path::new("noext")));
    }

    #[test]
    fn list_images_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        write_test_image(&tmp.path().join("b.jpg"), 8, 8);
        write_test_image(&tmp.path().join("a.png"), 8, 8);
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        write_test_image(&tmp.path().join("nested").join("c.jpg"), 8, 8);

        let names: Vec<String> = list_images(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn list_images_rejects_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let result = list_images(&tmp.path().join("absent"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn scan_folder_extracts_date_and_title() {
        let tmp = TempDir::new().unwrap();
        write_jpeg_with_date(&tmp.path().join("dated.jpg"), 16, 16, "2023:07:15 08:00:00");
        write_test_image(&tmp.path().join("titled.jpg"), 16, 16);
        std::fs::write(
            tmp.path().join("titled.xmp"),
            "<dc:title><rdf:li>Ridge</rdf:li></dc:title>",
        )
        .unwrap();

        let rows = scan_folder(tmp.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].filename, "dated.jpg");
        assert_eq!(rows[0].capture_date, "2023-07-15");
        assert_eq!(rows[0].title, "");
        assert_eq!(rows[1].filename, "titled.jpg");
        assert_eq!(rows[1].capture_date, "");
        assert_eq!(rows[1].title, "Ridge");
    }
}
