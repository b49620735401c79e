//! # Error Types
//!
//! This module defines the closed set of error kinds surfaced by the reader.
//! Every failure mode of the decoder stack maps onto exactly one variant, so
//! callers can match on the kind rather than inspect message strings.
//!
//! | Variant              | Raised by                                          |
//! |----------------------|----------------------------------------------------|
//! | `BadMagic`           | header decoder, wrong 16-byte magic                |
//! | `UnsupportedVersion` | header decoder, read-format version above 2        |
//! | `InvalidHeader`      | header decoder, payload fractions / usable size    |
//! | `OutOfRange`         | pager (page id), record (value index)              |
//! | `Truncated`          | short read from page, cell, or overflow chain      |
//! | `Corruption`         | reserved serial type, payload mismatch, depth      |
//! | `Unsupported`        | UTF-16 text, non-btree page kinds                  |
//! | `NotFound`           | schema lookup by name                              |
//! | `Io`                 | opening or mapping the backing file                |
//! | `Visitor`            | propagated verbatim from a caller's visitor        |
//!
//! Errors are terminal for the walk that produced them: nothing is skipped
//! or retried, and a visitor error aborts traversal immediately.

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while decoding a database file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not a sqlite database: bad magic")]
    BadMagic,

    #[error("file read-format version {0} is newer than this library supports")]
    UnsupportedVersion(u8),

    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    #[error("{what} {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: u64,
        limit: u64,
    },

    #[error("truncated read: {0}")]
    Truncated(&'static str),

    #[error("corrupt database: {0}")]
    Corruption(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("no object named {0:?}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("visitor error: {0}")]
    Visitor(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Creates a `Corruption` error from any displayable reason.
    pub fn corruption(reason: impl Into<String>) -> Self {
        Self::Corruption(reason.into())
    }

    /// Creates an `Unsupported` error from any displayable reason.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported(reason.into())
    }

    /// Wraps a caller-side error for propagation out of a tree walk.
    pub fn visitor(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Visitor(err.into())
    }

    /// Returns true if this error indicates a damaged file rather than a
    /// usage error or an out-of-scope feature.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::BadMagic | Self::InvalidHeader(_) | Self::Truncated(_) | Self::Corruption(_)
        )
    }
}
