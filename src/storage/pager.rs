//! # Pager and Page Cursor
//!
//! The pager turns a byte source plus the file-wide page size into
//! independently addressable pages. Page ids are 1-based: page 1 starts at
//! file offset 0 and carries the 100-byte file header ahead of its node
//! header; the pager itself does not treat it specially.
//!
//! A `Page` is an immutable slice of exactly `page_size` bytes. Page
//! identity is separate from read position: any number of `PageCursor`s
//! can be created over one page, each with its own position. The pager
//! holds no state besides its configuration, so concurrent `read_page`
//! calls from multiple threads are safe.

use super::ByteSource;
use crate::encoding::decode_varint;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Pager<S> {
    source: S,
    page_size: u32,
    page_count: u32,
}

impl<S: ByteSource> Pager<S> {
    pub fn new(source: S, page_size: u32, page_count: u32) -> Self {
        Self {
            source,
            page_size,
            page_count,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches page `id` (1-based). Ids outside `1..=page_count` are
    /// `OutOfRange`; a source shorter than the page's extent is
    /// `Truncated`.
    pub fn read_page(&self, id: u32) -> Result<Page<'_>> {
        if id == 0 || id > self.page_count {
            return Err(Error::OutOfRange {
                what: "page",
                index: u64::from(id),
                limit: u64::from(self.page_count),
            });
        }

        let offset = u64::from(id - 1) * u64::from(self.page_size);
        let data = self.source.read_at(offset, self.page_size as usize)?;
        Ok(Page { id, data })
    }
}

/// One page of the database file: an immutable byte range plus its id.
#[derive(Debug, Clone, Copy)]
pub struct Page<'s> {
    id: u32,
    data: &'s [u8],
}

impl<'s> Page<'s> {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn data(&self) -> &'s [u8] {
        self.data
    }

    pub fn cursor(&self) -> PageCursor<'s> {
        PageCursor {
            data: self.data,
            pos: 0,
        }
    }
}

/// Sequential big-endian reader over a page's bytes.
#[derive(Debug, Clone)]
pub struct PageCursor<'s> {
    data: &'s [u8],
    pos: usize,
}

impl<'s> PageCursor<'s> {
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::Truncated("page seek"));
        }
        self.pos = pos;
        Ok(())
    }

    /// Returns the next `len` bytes as a slice borrowed from the page.
    pub fn read_exact(&mut self, len: usize) -> Result<&'s [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::Truncated("page read"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_varint(&mut self) -> Result<i64> {
        let (value, consumed) = decode_varint(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }
}
