use std::fmt;

/// Result type for decktext-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while reading or generating cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A line has neither a cloze marker nor a field delimiter.
    /// Recoverable: the line is skipped and the batch continues.
    UnrecognizedCardFormat(String),

    /// No valid card was produced, so there is nothing to write
    EmptyBatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnrecognizedCardFormat(line) => {
                write!(f, "Unrecognized card format: {}", line)
            }
            Error::EmptyBatch => write!(f, "No valid cards found"),
        }
    }
}

impl std::error::Error for Error {}
