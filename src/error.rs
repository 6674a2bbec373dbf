//! Error types for zipkit

use std::io;

/// Result type for zipkit operations
pub type Result<T> = std::result::Result<T, ZipError>;

/// Error types that can occur during ZIP operations
#[derive(Debug)]
pub enum ZipError {
    /// Archive could not be opened or scanned for a valid EOCD record.
    UnreadableArchive(String),
    /// Archive is not writable: opened read-only, target unwritable, or
    /// a create target already exists.
    UnwritableArchive(String),
    /// An entry path is empty or cannot be encoded as UTF-8 or CP437.
    InvalidEntryPath(String),
    /// A non-{Store, Deflate} compression method was found on an entry.
    InvalidCompressionMethod(u16),
    /// A mutation would push the central directory offset beyond 2^32 - 1.
    InvalidStartOfCentralDirectoryOffset,
    /// The EOCD scan exhausted its search window without a signature match.
    MissingEndOfCentralDirectoryRecord,
    /// Recomputed CRC-32 over extracted bytes did not match the recorded CRC.
    InvalidCRC32,
    /// I/O error not otherwise classified above.
    Io(io::Error),
}

impl std::fmt::Display for ZipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZipError::UnreadableArchive(msg) => write!(f, "unreadable archive: {}", msg),
            ZipError::UnwritableArchive(msg) => write!(f, "unwritable archive: {}", msg),
            ZipError::InvalidEntryPath(path) => write!(f, "invalid entry path: {}", path),
            ZipError::InvalidCompressionMethod(method) => {
                write!(f, "invalid compression method: {}", method)
            }
            ZipError::InvalidStartOfCentralDirectoryOffset => {
                write!(f, "central directory offset would exceed 2^32 - 1")
            }
            ZipError::MissingEndOfCentralDirectoryRecord => {
                write!(f, "missing end of central directory record")
            }
            ZipError::InvalidCRC32 => write!(f, "CRC-32 mismatch"),
            ZipError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ZipError {}

impl From<io::Error> for ZipError {
    fn from(err: io::Error) -> Self {
        ZipError::Io(err)
    }
}
