use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::TreeParseError;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum SwdaError {
    /// A corpus file could not be opened or read
    #[error("Could not read {}: {source}", path.display())]
    FileAccess {
        /// The file that was being read
        path: PathBuf,
        /// The underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A row was too short (or otherwise unusable) to be interpreted
    #[error("Malformed row {row} in {}: {reason}", path.display())]
    MalformedRow {
        /// The file the row came from
        path: PathBuf,
        /// One-based line number of the row, when known
        row: u64,
        /// What was wrong with it
        reason: String,
    },

    /// A field declared as an integer (or date) held something else
    #[error("Field '{field}' could not be converted: {value:?}")]
    TypeConversion {
        /// The column name
        field: String,
        /// The offending raw value
        value: String,
    },

    /// A bracketed syntax tree could not be parsed
    #[error("Could not parse syntax tree: {0}")]
    TreeParse(#[from] TreeParseError),

    /// No metadata exists for the requested conversation
    #[error("No metadata for conversation {0}")]
    KeyNotFound(u32),

    /// The configured conversation file pattern is not a valid glob
    #[error("Invalid transcript pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Convenience alias used throughout this crate
pub type Result<T> = std::result::Result<T, SwdaError>;

impl SwdaError {
    pub(crate) fn file_access(path: &Path, source: std::io::Error) -> Self {
        SwdaError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed_row(path: &Path, row: u64, reason: impl Into<String>) -> Self {
        SwdaError::MalformedRow {
            path: path.to_path_buf(),
            row,
            reason: reason.into(),
        }
    }

    pub(crate) fn type_conversion(field: &str, value: &str) -> Self {
        SwdaError::TypeConversion {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn from_glob(error: glob::GlobError) -> Self {
        let path = error.path().to_path_buf();
        SwdaError::file_access(&path, error.into())
    }

    /// Interpret an error raised by the `csv` reader while reading `path`.
    pub(crate) fn from_csv(path: &Path, error: csv::Error) -> Self {
        let row = error.position().map(|position| position.line()).unwrap_or(0);
        let reason = error.to_string();
        match error.into_kind() {
            csv::ErrorKind::Io(source) => SwdaError::file_access(path, source),
            _ => SwdaError::malformed_row(path, row, reason),
        }
    }
}

/// Parse a base-10 integer field, tolerating surrounding whitespace.
pub(crate) fn parse_integer<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SwdaError::type_conversion(field, value))
}
