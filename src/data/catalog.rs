//! File Catalog Module
//! Lists the CSV files available in the data directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A selectable tabular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
}

/// Enumerates matching files in a fixed directory.
pub struct FileCatalog;

impl FileCatalog {
    /// List files with the given extension, sorted by name.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn list(dir: &Path, extension: &str) -> Vec<FileRef> {
        match Self::read_entries(dir, extension) {
            Ok(files) => {
                log::info!("Found {} {} files in {}", files.len(), extension, dir.display());
                files
            }
            Err(e) => {
                log::warn!("{:#}", e);
                Vec::new()
            }
        }
    }

    fn read_entries(dir: &Path, extension: &str) -> Result<Vec<FileRef>> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Cannot read data directory {}", dir.display()))?;

        let mut files: Vec<FileRef> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension))
            })
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().to_string();
                Some(FileRef { name, path })
            })
            .collect();

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}
