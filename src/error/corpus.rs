use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read replay file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to open capture file {path}: {source}")]
    OpenCapture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid capture file {path}: {reason}")]
    InvalidCapture { path: PathBuf, reason: String },
    #[error("Capture file {path} ends in the middle of a block.")]
    TruncatedCapture { path: PathBuf },
    #[error("Capture file {path} has a block larger than {limit} bytes.")]
    OversizedBlock { path: PathBuf, limit: usize },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
