use crate::error::TransferError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files discovered under one selected path, uploaded relative to `base_dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    base_dir: PathBuf,
    files: Vec<PathBuf>,
}

impl UploadBatch {
    /// Enumerate the files implied by a selected file or directory.
    ///
    /// The base directory is always the parent of `selected`, so a selected
    /// directory's own name becomes the first segment of every relative path.
    /// Entries the walk cannot read are skipped.
    pub fn collect(selected: &Path) -> Result<Self, TransferError> {
        let metadata = fs::metadata(selected).map_err(|source| TransferError::Stat {
            path: selected.to_path_buf(),
            source,
        })?;

        let base_dir = selected.parent().unwrap_or(selected).to_path_buf();

        let files = if metadata.is_dir() {
            WalkDir::new(selected)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        debug!("Skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect()
        } else {
            vec![selected.to_path_buf()]
        };

        Ok(Self { base_dir, files })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
