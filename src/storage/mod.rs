//! # Storage Module
//!
//! This module provides the foundational byte-access layer for the reader:
//! a random-access byte source, the page abstraction on top of it, and the
//! 100-byte file header.
//!
//! ## Architecture Overview
//!
//! Everything above this module consumes immutable pages. The stack is:
//!
//! ```text
//! +------------------------------------+
//! |  B-tree / record decoders          |
//! +------------------------------------+
//! |  Pager (1-based page ids)          |
//! +------------------------------------+
//! |  ByteSource (read_at -> &[u8])     |
//! +------------------------------------+
//! |  MmapSource | MemSource            |
//! +------------------------------------+
//! ```
//!
//! ## Zero-Copy Reads
//!
//! `ByteSource::read_at` returns a slice borrowed from the source rather
//! than filling a caller buffer. Pages are therefore windows into the
//! mapped file (or the owned buffer) and cell decoding can borrow payload
//! bytes directly from page memory when no overflow chain is involved.
//!
//! ## Thread Safety
//!
//! Sources are read-only and take `&self` everywhere, so a single open
//! database may be shared across threads; there is no seek position or any
//! other mutable state below the cursor types, which are per-call values.
//!
//! ## Module Organization
//!
//! - `mmap`: read-only memory-mapped file source
//! - `mem`: owned in-memory source
//! - `headers`: file header layout, validation, text encoding
//! - `pager`: page fetch plus the sequential page cursor

pub mod headers;
pub mod mem;
pub mod mmap;
pub mod pager;

pub use headers::{DbHeader, TextEncoding, FILE_HEADER_SIZE, MAGIC, MIN_USABLE_SIZE};
pub use mem::MemSource;
pub use mmap::MmapSource;
pub use pager::{Page, PageCursor, Pager};

use crate::error::{Error, Result};

/// A random-access, read-only byte source backing a database file.
pub trait ByteSource {
    /// Total length of the source in bytes.
    fn len(&self) -> u64;

    /// Returns `len` bytes starting at `offset`, borrowed from the source.
    ///
    /// A range extending past the end of the source is `Truncated`.
    fn read_at(&self, offset: u64, len: usize) -> Result<&[u8]>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn slice_at<'a>(
    bytes: &'a [u8],
    offset: u64,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8]> {
    let start = usize::try_from(offset).map_err(|_| Error::Truncated(what))?;
    let end = start.checked_add(len).ok_or(Error::Truncated(what))?;
    bytes.get(start..end).ok_or(Error::Truncated(what))
}
