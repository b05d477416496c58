use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::{FileError, RestoreError};
use crate::metadata::{self, MetadataIndex};
use crate::timestamps::{self, Support};
use crate::{Event, ReportCallback, RestoreOptions};

/// What happened to one folder entry.
#[derive(Debug)]
pub enum Outcome {
    /// Timestamps written; `date` is the rendered value
    Applied { date: String },
    /// Dry run; `date` is what would have been written
    Previewed { date: String },
    /// No metadata row for this name
    Skipped,
    Failed(FileError),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub filename: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub filename: String,
    pub message: String,
}

/// Totals for one pass over a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreSummary {
    /// Applied or previewed
    pub updated: u64,
    pub skipped: u64,
    pub failures: Vec<FileFailure>,
}

impl RestoreSummary {
    pub fn errors(&self) -> u64 {
        self.failures.len() as u64
    }

    fn record(&mut self, file: &FileOutcome) {
        match &file.outcome {
            Outcome::Applied { .. } | Outcome::Previewed { .. } => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(err) => self.failures.push(FileFailure {
                filename: file.filename.clone(),
                message: err.to_string(),
            }),
        }
    }
}

/// Restore timestamps for every non-CSV entry of `folder`, in listing order.
/// Per-file failures are recorded in the summary and never abort the pass.
pub fn restore_folder(
    folder: &Path,
    index: &MetadataIndex,
    options: &RestoreOptions,
    support: Support,
    report: &ReportCallback<'_>,
) -> Result<RestoreSummary, RestoreError> {
    options.formats.validate()?;

    let read_err = |source| RestoreError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(folder).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        if metadata::is_csv_name(&filename) {
            continue;
        }
        entries.push((filename, entry.path()));
    }

    let total = entries.len() as u64;
    let mut summary = RestoreSummary::default();

    for (current, (filename, path)) in entries.into_iter().enumerate() {
        let outcome = match restore_file(&path, &filename, index, options, support) {
            Ok(outcome) => outcome,
            Err(err) => Outcome::Failed(err),
        };
        let file = FileOutcome { filename, outcome };
        summary.record(&file);
        report(Event::File {
            current: current as u64,
            total,
            outcome: &file,
        });
    }

    Ok(summary)
}

fn restore_file(
    path: &Path,
    filename: &str,
    index: &MetadataIndex,
    options: &RestoreOptions,
    support: Support,
) -> Result<Outcome, FileError> {
    let Some(raw) = index.lookup(filename)? else {
        return Ok(Outcome::Skipped);
    };

    let dt = date::parse_recorded_date(raw, &options.formats)?;
    let date = date::render(&dt, &options.formats);
    // Resolved in dry runs too, so a preview fails wherever the real run would
    let instant = timestamps::to_instant(dt, options.utc)?;

    if options.dry_run {
        return Ok(Outcome::Previewed { date });
    }

    tracing::debug!("{} -> {}", path.display(), instant.to_rfc3339());
    timestamps::apply(path, instant, support)?;
    Ok(Outcome::Applied { date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        File::create(dir.join(name))
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
    }

    fn options(folder: PathBuf, dry_run: bool) -> RestoreOptions {
        RestoreOptions {
            folder,
            dry_run,
            utc: true,
            ..Default::default()
        }
    }

    fn run_pass(folder: &Path, dry_run: bool) -> (RestoreSummary, Vec<(String, String)>) {
        let index = metadata::load_metadata(folder).unwrap();
        let support = timestamps::check_support().unwrap();
        let seen = Mutex::new(Vec::new());
        let report = |event: Event<'_>| {
            if let Event::File { outcome, .. } = event {
                let label = match &outcome.outcome {
                    Outcome::Applied { date } => format!("applied {}", date),
                    Outcome::Previewed { date } => format!("previewed {}", date),
                    Outcome::Skipped => "skipped".to_string(),
                    Outcome::Failed(_) => "failed".to_string(),
                };
                seen.lock().unwrap().push((outcome.filename.clone(), label));
            }
        };
        let summary = restore_folder(
            folder,
            &index,
            &options(folder.to_path_buf(), dry_run),
            support,
            &report,
        )
        .unwrap();
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        (summary, seen)
    }

    #[test]
    fn test_outcomes_per_file() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "details.csv",
            "imgName,originalCreationDate\n\
             good.jpg,\"Sunday June 11,2023 09:15 AM GMT\"\n\
             bad.jpg,not a date\n",
        );
        write_file(dir.path(), "good.jpg", "");
        write_file(dir.path(), "bad.jpg", "");
        write_file(dir.path(), "unknown.png", "");

        let (summary, seen) = run_pass(dir.path(), false);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors(), 1);
        assert_eq!(summary.failures[0].filename, "bad.jpg");
        assert_eq!(
            seen,
            vec![
                ("bad.jpg".to_string(), "failed".to_string()),
                ("good.jpg".to_string(), "applied 11.06.2023 09:15".to_string()),
                ("unknown.png".to_string(), "skipped".to_string()),
            ]
        );
    }

    #[test]
    fn test_csv_entries_not_reported() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a.csv", "imgName,originalCreationDate\n");
        write_file(dir.path(), "B.CSV", "imgName,originalCreationDate\n");

        let (summary, seen) = run_pass(dir.path(), false);
        assert_eq!(summary, RestoreSummary::default());
        assert!(seen.is_empty());
    }

    #[test]
    fn test_preview_matches_apply() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "details.csv",
            "imgName,originalCreationDate\n\
             a.jpg,\"Monday January 02,2023 03:04 PM GMT\"\n",
        );
        write_file(dir.path(), "a.jpg", "");

        let (_, preview) = run_pass(dir.path(), true);
        let (_, applied) = run_pass(dir.path(), false);
        assert_eq!(preview[0].1, "previewed 02.01.2023 15:04");
        assert_eq!(applied[0].1, "applied 02.01.2023 15:04");
    }
}
