//! Error types for indexing operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use wellfile_config::ConfigError;

/// Result alias for indexer operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised while building or writing indexes.
#[derive(Debug)]
pub enum IndexError {
    /// A regex failed to compile.
    RegexCompile {
        /// Regex pattern.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// Failed to create an output directory.
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to write an output file.
    WriteOutput {
        /// Output path.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to serialise a JSON payload.
    SerializeJson {
        /// Payload label.
        label: &'static str,
        /// JSON error.
        source: serde_json::Error,
    },
    /// Failed to write a CSV file.
    WriteCsv {
        /// Output path.
        path: PathBuf,
        /// CSV error.
        source: csv::Error,
    },
    /// Failed to load or save the folder catalog.
    Catalog {
        /// Underlying configuration error.
        source: ConfigError,
    },
}

impl Display for IndexError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegexCompile { .. } => formatter.write_str("failed to compile regex"),
            Self::CreateDir { .. } => formatter.write_str("failed to create output directory"),
            Self::WriteOutput { .. } => formatter.write_str("failed to write output file"),
            Self::SerializeJson { .. } => formatter.write_str("failed to serialise json payload"),
            Self::WriteCsv { .. } => formatter.write_str("failed to write csv file"),
            Self::Catalog { .. } => formatter.write_str("folder catalog failure"),
        }
    }
}

impl Error for IndexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RegexCompile { source, .. } => Some(source),
            Self::CreateDir { source, .. } | Self::WriteOutput { source, .. } => Some(source),
            Self::SerializeJson { source, .. } => Some(source),
            Self::WriteCsv { source, .. } => Some(source),
            Self::Catalog { source } => Some(source),
        }
    }
}

impl From<ConfigError> for IndexError {
    fn from(source: ConfigError) -> Self {
        Self::Catalog { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn assert_error(err: &IndexError, message: &str) {
        assert_eq!(err.to_string(), message);
        assert!(err.source().is_some());
    }

    #[test]
    fn index_error_display_and_source() {
        assert_error(
            &IndexError::RegexCompile {
                pattern: "[",
                source: regex::Error::Syntax("bad regex".to_string()),
            },
            "failed to compile regex",
        );
        assert_error(
            &IndexError::CreateDir {
                path: PathBuf::from("out"),
                source: io::Error::other("io"),
            },
            "failed to create output directory",
        );
        assert_error(
            &IndexError::WriteOutput {
                path: PathBuf::from("out/index.json"),
                source: io::Error::other("io"),
            },
            "failed to write output file",
        );
        assert_error(
            &IndexError::WriteCsv {
                path: PathBuf::from("out/index.csv"),
                source: csv::Error::from(io::Error::other("io")),
            },
            "failed to write csv file",
        );
        assert_error(
            &IndexError::from(ConfigError::Io {
                operation: "catalog.read",
                path: PathBuf::from("folders.json"),
                source: io::Error::other("io"),
            }),
            "folder catalog failure",
        );
    }
}
