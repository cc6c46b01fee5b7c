use thiserror::Error;

/// Errors raised while parsing, applying or rendering a patch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed patch at line {line}: {reason}")]
    MalformedPatch { line: usize, reason: String },
    #[error("hunk failed at line {line}: {reason}")]
    HunkFailed { line: usize, reason: String },
    #[error("hunk {index} starts before the end of the hunk preceding it")]
    HunksOutOfOrder { index: usize },
    #[error("kept line carries no content and cannot be rendered")]
    MissingContent,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedPatch {
            line,
            reason: reason.into(),
        }
    }
}

