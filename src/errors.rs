use thiserror::Error;

use crate::dfs::DfsError;

/// Fatal outcomes of a partition metadata load.
///
/// `LoadError` is `Clone` because a single load outcome is delivered to every
/// caller waiting on the same cache key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("compressed file not supported without compression input format: {0}")]
    CompressedFileFormatMismatch(String),
    #[error("expected file with {suffix} suffix: {path}")]
    MissingCompressionSuffix { path: String, suffix: &'static str },
    #[error("compressed text files are not supported: {0}")]
    UnsupportedCompression(String),
    #[error("couldn't determine block locations for path '{path}': {message}")]
    StorageQuery { path: String, message: String },
}

impl LoadError {
    pub fn storage(path: &str, err: DfsError) -> LoadError {
        LoadError::StorageQuery {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}
