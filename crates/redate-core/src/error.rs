use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before any file is touched.
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Folder not found: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No CSV metadata files found in: {}", .0.display())]
    NoMetadata(PathBuf),

    #[error("Failed to list folder {}: {source}", path.display())]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read metadata file {}: {source}", path.display())]
    ReadCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Metadata file {} is empty: no columns to parse", .0.display())]
    EmptyCsv(PathBuf),

    #[error("Metadata file {}: expected {expected} fields in line {line}, saw {found}", path.display())]
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {kind} date format '{pattern}'")]
    InvalidFormat { kind: &'static str, pattern: String },

    #[error("Timestamp writing is not supported on this platform: {0}")]
    Unsupported(String),
}

/// Errors attributed to a single file. These never abort the run.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("metadata has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("matching metadata row has no originalCreationDate value")]
    MissingDate,

    #[error("time data '{value}' does not match format '{format}': {source}")]
    InvalidDate {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(chrono::NaiveDateTime),

    #[error("failed to set timestamps: {0}")]
    SetTimes(#[from] io::Error),
}
