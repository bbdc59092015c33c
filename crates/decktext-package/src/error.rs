use std::fmt;

/// Result type for decktext-package operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing a package
#[derive(Debug)]
pub enum Error {
    /// The archive or a compressed member could not be read
    CorruptContainer(String),

    /// The archive holds none of the known collection databases
    MissingDatabase,

    /// Input ended while a varint still had its continuation bit set
    TruncatedVarint { position: usize },

    /// A length or fixed-width field points past the end of the buffer
    TruncatedPayload { position: usize, needed: usize },

    /// A scan step did not advance the cursor
    ScanStalled { position: usize },

    /// Card batch could not be turned into notes
    Card(decktext_core::Error),

    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Writing the archive failed
    Zip(zip::result::ZipError),

    /// Collection metadata could not be encoded
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CorruptContainer(msg) => write!(f, "Corrupt package: {}", msg),
            Error::MissingDatabase => write!(
                f,
                "No collection database found (expected collection.anki21b, collection.anki21 or collection.anki2)"
            ),
            Error::TruncatedVarint { position } => {
                write!(f, "Truncated varint at byte {}", position)
            }
            Error::TruncatedPayload { position, needed } => write!(
                f,
                "Truncated payload at byte {}: {} more bytes needed",
                position, needed
            ),
            Error::ScanStalled { position } => {
                write!(f, "Wire scan made no progress at byte {}", position)
            }
            Error::Card(err) => write!(f, "{}", err),
            Error::Database(err) => write!(f, "Database error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Zip(err) => write!(f, "Archive error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Card(err) => Some(err),
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Zip(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::CorruptContainer(_)
            | Error::MissingDatabase
            | Error::TruncatedVarint { .. }
            | Error::TruncatedPayload { .. }
            | Error::ScanStalled { .. } => None,
        }
    }
}

impl From<decktext_core::Error> for Error {
    fn from(err: decktext_core::Error) -> Self {
        Error::Card(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
