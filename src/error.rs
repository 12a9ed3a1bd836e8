// ⚠️ Error Types - Dataset loading failures
// Everything here is a startup-time failure: the server refuses to start.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: empty Source")]
    EmptySource { line: u64 },

    #[error("line {line}: unknown measure '{value}' (expected 'relative' or 'total')")]
    InvalidMeasure { line: u64, value: String },

    #[error("line {line}: contribution '{value}' is not a number")]
    InvalidContribution { line: u64, value: String },

    /// Any content error from a file, tagged with where it came from
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<DatasetError>,
    },
}

impl DatasetError {
    /// The underlying error, looking through the file wrapper
    pub fn root(&self) -> &DatasetError {
        match self {
            DatasetError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
