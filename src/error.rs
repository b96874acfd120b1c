// Library error type

use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by [`Reader::read`](crate::Reader::read).
///
/// Truncation and text-decoding problems are recovered inside the parsers
/// and never reach this type; a malformed tag yields default metadata, not
/// an error.
#[derive(Debug)]
pub enum Error {
    /// The file is too small to carry either supported tag family.
    UnsupportedFormat(PathBuf),
    /// The file could not be opened or read.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedFormat(path) => {
                write!(f, "unsupported file format: {}", path.display())
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
