use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("No folder selected: select at least one folder before collecting")]
    NoFolderSelected,

    #[error("Invalid filter value: {0}")]
    InvalidFilterValue(String),

    #[error("Skipped file '{path}': {reason}")]
    ScanReadSkipped { path: PathBuf, reason: String },

    #[error("Failed to write output file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output file '{0}' does not exist, collect files first")]
    OutputMissing(PathBuf),

    #[error("Collection failed: {0}")]
    CollectionFailed(#[source] Box<AppError>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("State Store Error: {0}")]
    StateStore(String),

    #[error("WalkDir Error: {0}")]
    WalkDir(String),

    #[error("Glob Pattern Error: {0}")]
    Glob(String),
}

impl AppError {
    /// Wraps a scanner or writer failure as a failed run. Already wrapped errors pass through.
    pub fn into_collection_failure(self) -> Self {
        match self {
            AppError::CollectionFailed(_) => self,
            other => AppError::CollectionFailed(Box::new(other)),
        }
    }

    /// Precondition failures abort before any I/O happens.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AppError::NoFolderSelected | AppError::InvalidFilterValue(_)
        )
    }
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::WalkDir(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_is_not_nested_twice() {
        let err = AppError::Glob("bad".to_string()).into_collection_failure();
        let again = err.into_collection_failure();
        match again {
            AppError::CollectionFailed(inner) => {
                assert!(matches!(*inner, AppError::Glob(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn precondition_kinds() {
        assert!(AppError::NoFolderSelected.is_precondition());
        assert!(AppError::InvalidFilterValue("0".into()).is_precondition());
        assert!(!AppError::OutputMissing(PathBuf::from("x")).is_precondition());
    }
}
