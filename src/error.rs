use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to open archive {path}: {source}")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse archive: {message}")]
    ArchiveParse { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write dataset {path}: {message}")]
    DatasetWrite { path: PathBuf, message: String },

    #[error("Progress cache error: {message}")]
    Cache { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractError {
    fn user_message(&self) -> String {
        match self {
            ExtractError::ArchiveOpen { path, source } => {
                format!("Cannot open GenBank archive {}: {}", path.display(), source)
            }
            ExtractError::ArchiveParse { message } => {
                format!("GenBank parse error: {}", message)
            }
            ExtractError::DatasetWrite { path, message } => {
                format!("Cannot write dataset {}: {}", path.display(), message)
            }
            ExtractError::Cache { message } => {
                format!("Progress cache error: {}", message)
            }
            ExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ExtractError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractError::ArchiveOpen { .. } => Some(
                "Check that the archive path exists and is readable. Paths are resolved relative to the current directory.".to_string()
            ),
            ExtractError::ArchiveParse { .. } => Some(
                "The file does not look like a GenBank flat file. Verify it is uncompressed and in GenBank format (LOCUS ... //).".to_string()
            ),
            ExtractError::DatasetWrite { .. } => Some(
                "Ensure the output directory is writable and has free space, or choose another with --output.".to_string()
            ),
            ExtractError::Cache { .. } => Some(
                "The scan-total cache is only a progress aid; delete the cache file to rebuild it.".to_string()
            ),
            ExtractError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<gb_io::reader::GbParserError> for ExtractError {
    fn from(error: gb_io::reader::GbParserError) -> Self {
        ExtractError::ArchiveParse {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::Config {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ExtractError {
    fn from(error: csv::Error) -> Self {
        let message = error.to_string();
        match error.into_kind() {
            csv::ErrorKind::Io(io_err) => ExtractError::Io(io_err),
            _ => ExtractError::Cache { message },
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ExtractError::ArchiveOpen {
            path: PathBuf::from("missing.gb"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.user_message().contains("missing.gb"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_config_error_has_suggestion() {
        let error = ExtractError::Config {
            message: "bad toml".to_string(),
        };
        assert!(error.user_message().contains("bad toml"));
        assert!(error.suggestion().unwrap().contains("configuration"));
    }

    #[test]
    fn test_csv_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let csv_err = csv::Error::from(io_err);
        let err = ExtractError::from(csv_err);
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
