pub mod date;
pub mod error;
pub mod media;
pub mod metadata;
pub mod restore;
pub mod timestamps;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use date::DateFormats;
pub use error::{FileError, RestoreError};
pub use restore::{FileFailure, FileOutcome, Outcome, RestoreSummary};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestoreOptions {
    /// Folder holding the exported media and CSV metadata
    pub folder: PathBuf,
    /// Report what would change without touching any file
    #[serde(default)]
    pub dry_run: bool,
    /// Treat recorded dates as UTC instead of local time
    #[serde(default)]
    pub utc: bool,
    #[serde(default)]
    pub formats: DateFormats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResult {
    pub records_loaded: u64,
    pub csv_files: u64,
    pub extensions: Vec<String>,
    pub media_files: u64,
    pub updated: u64,
    pub skipped: u64,
    pub errors: u64,
    #[serde(default)]
    pub failures: Vec<FileFailure>,
}

/// Something worth telling the user while a run progresses.
#[derive(Debug)]
pub enum Event<'a> {
    MetadataLoaded { records: u64, files: u64 },
    MediaFound {
        count: u64,
        extensions: &'a BTreeSet<String>,
    },
    File {
        current: u64,
        total: u64,
        outcome: &'a FileOutcome,
    },
}

/// Type alias for the report callback
pub type ReportCallback<'a> = dyn Fn(Event<'_>) + Send + Sync + 'a;

pub fn ensure_folder(path: &Path) -> Result<(), RestoreError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(RestoreError::NotADirectory(path.to_path_buf()))
    }
}

/// Load metadata, enumerate media, then restore timestamps folder-wide.
/// Every fatal check happens before the first file is touched.
pub fn run(options: &RestoreOptions, report: &ReportCallback<'_>) -> anyhow::Result<RestoreResult> {
    let folder = options.folder.as_path();
    ensure_folder(folder)?;
    options.formats.validate()?;

    let support = timestamps::check_support()?;
    if !support.creation_time && !options.dry_run {
        tracing::warn!("Creation time cannot be set on this platform; only modification time will be restored");
    }

    tracing::info!(
        "Restoring timestamps in {} (dry run: {})",
        folder.display(),
        options.dry_run
    );

    let index = metadata::load_metadata(folder)?;
    report(Event::MetadataLoaded {
        records: index.len() as u64,
        files: index.files.len() as u64,
    });

    // Informational only: the restore pass looks at every non-CSV entry.
    let extensions = media::non_csv_extensions(folder)?;
    let media_files = media::list_media_files(folder, &extensions)?;
    report(Event::MediaFound {
        count: media_files.len() as u64,
        extensions: &extensions,
    });

    let summary = restore::restore_folder(folder, &index, options, support, report)?;

    Ok(RestoreResult {
        records_loaded: index.len() as u64,
        csv_files: index.files.len() as u64,
        extensions: extensions.into_iter().collect(),
        media_files: media_files.len() as u64,
        updated: summary.updated,
        skipped: summary.skipped,
        errors: summary.errors(),
        failures: summary.failures,
    })
}
