//! # Overflow Page Chains
//!
//! Payload that does not fit in a cell's local area continues on a singly
//! linked chain of dedicated overflow pages. Each page in the chain begins
//! with a big-endian 32-bit pointer to the next page (zero terminates);
//! the remaining `usable_size - 4` bytes carry payload.
//!
//! `OverflowChain` is a lazy stream of exactly the declared number of
//! bytes: pages are fetched one at a time as chunks are consumed, and the
//! final page's trailing garbage is never exposed. A chain that ends while
//! bytes are still owed is `Truncated`.

use crate::error::{Error, Result};
use crate::storage::{ByteSource, Pager};

pub struct OverflowChain<'p, S> {
    pager: &'p Pager<S>,
    next_page: u32,
    usable_size: u32,
    remaining: u64,
}

impl<'p, S: ByteSource> OverflowChain<'p, S> {
    /// Starts a chain at `first_page` owing exactly `total` payload bytes.
    pub fn new(pager: &'p Pager<S>, first_page: u32, usable_size: u32, total: u64) -> Self {
        Self {
            pager,
            next_page: first_page,
            usable_size,
            remaining: total,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Fetches the next page of the chain and returns its payload bytes,
    /// or `None` once the declared byte count has been consumed.
    pub fn next_chunk(&mut self) -> Result<Option<&'p [u8]>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if self.next_page == 0 {
            return Err(Error::Truncated("overflow chain ended early"));
        }

        let page = self.pager.read_page(self.next_page)?;
        let mut cursor = page.cursor();
        self.next_page = cursor.read_u32()?;

        let per_page = u64::from(self.usable_size) - 4;
        let take = self.remaining.min(per_page) as usize;
        let chunk = cursor.read_exact(take)?;
        self.remaining -= take as u64;
        Ok(Some(chunk))
    }

    /// Drains the chain into `out`.
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<()> {
        while let Some(chunk) = self.next_chunk()? {
            out.extend_from_slice(chunk);
        }
        Ok(())
    }
}
