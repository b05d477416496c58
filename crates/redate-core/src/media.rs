use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RestoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Just the filename
    pub filename: String,
    pub path: PathBuf,
    /// Lowercase, without the dot. Empty if the name has none.
    pub extension: String,
}

impl MediaFile {
    pub fn new(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&filename);
        Self {
            filename,
            path,
            extension,
        }
    }
}

/// Text after the last dot, lowercased. A dot-file's leading dot does not count.
pub fn extension_of(filename: &str) -> String {
    let trimmed = filename.trim_start_matches('.');
    match trimmed.rfind('.') {
        Some(pos) => trimmed[pos + 1..].to_lowercase(),
        None => String::new(),
    }
}

fn read_folder(folder: &Path) -> Result<Vec<PathBuf>, RestoreError> {
    let read_err = |source| RestoreError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(folder).map_err(read_err)? {
        paths.push(entry.map_err(read_err)?.path());
    }
    Ok(paths)
}

/// Distinct extensions of the folder's direct entries, `csv` excluded.
pub fn non_csv_extensions(folder: &Path) -> Result<BTreeSet<String>, RestoreError> {
    let mut extensions: BTreeSet<String> = read_folder(folder)?
        .into_iter()
        .map(|p| MediaFile::new(p).extension)
        .filter(|ext| !ext.is_empty())
        .collect();
    extensions.remove("csv");
    Ok(extensions)
}

/// Direct entries of `folder` whose extension is in `extensions`.
pub fn list_media_files(
    folder: &Path,
    extensions: &BTreeSet<String>,
) -> Result<Vec<MediaFile>, RestoreError> {
    Ok(read_folder(folder)?
        .into_iter()
        .map(MediaFile::new)
        .filter(|m| extensions.contains(&m.extension))
        .collect())
}
