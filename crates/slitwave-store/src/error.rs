//! Error types for the frame store.

use std::fmt;
use std::io;
use std::path::PathBuf;

use slitwave_core::{GridShape, ParamsError};

/// Errors that can occur while creating, writing, reading, or deleting a store.
#[derive(Debug)]
pub enum StoreError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// A store (or any file) already exists at the target path.
    AlreadyExists {
        /// The occupied path.
        path: PathBuf,
    },
    /// The requested store or dataset does not exist.
    NotFound {
        /// What was missing (a path or a dataset name).
        what: String,
    },
    /// An array shape does not match the shape declared at creation.
    ShapeMismatch {
        /// Shape the store was created with.
        expected: GridShape,
        /// Shape that was supplied.
        found: GridShape,
    },
    /// A frame index outside `[0, frame_count)`.
    IndexOutOfRange {
        /// The rejected index.
        index: u64,
        /// Number of frames in the store.
        frame_count: u64,
    },
    /// The store was closed; its handle is released.
    Closed,
    /// Write attempted on a store opened for reading.
    ReadOnly,
    /// The file does not start with the expected `b"SLIT"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The header or payload is inconsistent (truncated or corrupt file).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// Header parameters fail validation.
    Params(ParamsError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::AlreadyExists { path } => {
                write!(f, "store already exists at {}", path.display())
            }
            Self::NotFound { what } => write!(f, "not found: {what}"),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {expected}, found {found}")
            }
            Self::IndexOutOfRange { index, frame_count } => {
                write!(f, "frame index {index} out of range [0, {frame_count})")
            }
            Self::Closed => write!(f, "store is closed"),
            Self::ReadOnly => write!(f, "store is opened read-only"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"SLIT\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed store: {detail}"),
            Self::Params(e) => write!(f, "invalid header parameters: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Params(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParamsError> for StoreError {
    fn from(e: ParamsError) -> Self {
        Self::Params(e)
    }
}
