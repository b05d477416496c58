use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FileError, RestoreError};

pub const NAME_COLUMN: &str = "imgName";
pub const DATE_COLUMN: &str = "originalCreationDate";

/// One row of an iCloud export CSV. Other columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "imgName", default)]
    pub img_name: Option<String>,
    #[serde(rename = "originalCreationDate", default)]
    pub original_creation_date: Option<String>,
}

/// All records from every CSV in a folder, in concatenation order.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    records: Vec<MetadataRecord>,
    /// CSV files the records came from
    pub files: Vec<PathBuf>,
    has_name_column: bool,
    has_date_column: bool,
}

impl MetadataIndex {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append the rows of one CSV file.
    /// Short rows are padded with empty cells; rows longer than the header are rejected.
    pub fn push_file(&mut self, path: &Path) -> Result<usize, RestoreError> {
        let read_err = |source| RestoreError::ReadCsv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(read_err)?;

        let headers = reader.headers().map_err(read_err)?.clone();
        if headers.is_empty() {
            return Err(RestoreError::EmptyCsv(path.to_path_buf()));
        }
        self.has_name_column |= headers.iter().any(|h| h == NAME_COLUMN);
        self.has_date_column |= headers.iter().any(|h| h == DATE_COLUMN);

        let before = self.records.len();
        for record in reader.records() {
            let mut record = record.map_err(read_err)?;
            if record.len() > headers.len() {
                return Err(RestoreError::TooManyFields {
                    path: path.to_path_buf(),
                    line: record.position().map_or(0, |p| p.line()),
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            while record.len() < headers.len() {
                record.push_field("");
            }
            let row: MetadataRecord = record.deserialize(Some(&headers)).map_err(read_err)?;
            self.records.push(row);
        }
        self.files.push(path.to_path_buf());
        Ok(self.records.len() - before)
    }

    /// Recorded date of the first row whose `imgName` equals `filename` exactly.
    /// `Ok(None)` means no row matched.
    pub fn lookup(&self, filename: &str) -> Result<Option<&str>, FileError> {
        if !self.has_name_column {
            return Err(FileError::MissingColumn(NAME_COLUMN));
        }
        if !self.has_date_column {
            return Err(FileError::MissingColumn(DATE_COLUMN));
        }

        let Some(record) = self
            .records
            .iter()
            .find(|r| r.img_name.as_deref() == Some(filename))
        else {
            return Ok(None);
        };

        match record.original_creation_date.as_deref() {
            Some(date) if !date.is_empty() => Ok(Some(date)),
            _ => Err(FileError::MissingDate),
        }
    }
}

/// True for names ending in `.csv`, any case.
pub fn is_csv_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}

/// Load and merge every CSV metadata file found directly in `folder`.
pub fn load_metadata(folder: &Path) -> Result<MetadataIndex, RestoreError> {
    let entries = fs::read_dir(folder).map_err(|source| RestoreError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut index = MetadataIndex::default();
    for entry in entries {
        let entry = entry.map_err(|source| RestoreError::ReadFolder {
            path: folder.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        if !is_csv_name(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        let rows = index.push_file(&path)?;
        tracing::debug!("Loaded {} rows from {}", rows, path.display());
    }

    if index.files.is_empty() {
        return Err(RestoreError::NoMetadata(folder.to_path_buf()));
    }

    Ok(index)
}
