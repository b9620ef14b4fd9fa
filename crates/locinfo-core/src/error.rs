//! Error types for the locinfo-core library.
//!
//! Building and serializing location records never fails on its own; the
//! only fallible paths are the injected writer (which surfaces plain
//! [`std::io::Error`]s) and reading serialized streams back, which is what
//! this module describes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for locinfo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for decoding and file operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed object stream
    #[error("invalid object stream at offset {offset}: {details}")]
    InvalidStream {
        /// Byte offset where the error occurred
        offset: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// Stream ended in the middle of a record
    #[error("unexpected end of stream at offset {offset}: needed {needed} more byte(s)")]
    UnexpectedEof {
        /// Byte offset where more data was expected
        offset: usize,
        /// Number of bytes that were missing
        needed: usize,
    },

    /// Back-reference to a class descriptor that was never written
    #[error("unknown class descriptor handle {handle:#x} at offset {offset}")]
    UnknownHandle {
        /// The referenced wire handle
        handle: u32,
        /// Byte offset of the reference
        offset: usize,
    },

    /// String payload was not valid UTF-8
    #[error("invalid UTF-8 in string at offset {offset}")]
    Utf8 {
        /// Byte offset of the string payload
        offset: usize,
        /// Underlying decode error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new stream format error
    pub fn invalid_stream(offset: usize, details: impl Into<String>) -> Self {
        Self::InvalidStream {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new truncation error
    pub fn unexpected_eof(offset: usize, needed: usize) -> Self {
        Self::UnexpectedEof { offset, needed }
    }

    /// Returns true if the error was caused by malformed input rather than I/O
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidStream { .. }
                | Self::UnexpectedEof { .. }
                | Self::UnknownHandle { .. }
                | Self::Utf8 { .. }
        )
    }
}
