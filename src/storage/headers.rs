//! # File Header Definitions
//!
//! This module provides the type-safe, zerocopy-based view of the 100-byte
//! header at the start of every database file, together with its validation
//! rules and the parsed `DbHeader` the rest of the reader consumes.
//!
//! ## Header Layout (100 bytes, all multi-byte fields big-endian)
//!
//! ```text
//! Offset  Size  Field               Description
//! ------  ----  ------------------  -------------------------------------
//! 0       16    magic               "SQLite format 3\0"
//! 16      2     page_size           512..=32768 power of two, 1 = 65536
//! 18      1     write_version       1 = journal, 2 = WAL
//! 19      1     read_version        must be <= 2 to be readable
//! 20      1     reserved_bytes     unused space at the end of each page
//! 21      1     max_embedded_frac  must be 64
//! 22      1     min_embedded_frac  must be 32
//! 23      1     leaf_frac          must be 32
//! 24      4     change_counter
//! 28      4     page_count         in-header database size in pages
//! 32      4     freelist_head      first freelist trunk page (unread)
//! 36      4     freelist_count     total freelist pages (unread)
//! 40      4     schema_cookie
//! 44      4     schema_format      1..=4, tolerated but not interpreted
//! 48      4     default_cache_size
//! 52      4     largest_root_page  nonzero in (incremental-)vacuum files
//! 56      4     text_encoding      1 = UTF-8, 2 = UTF-16le, 3 = UTF-16be
//! 60      4     user_version
//! 64      4     incremental_vacuum
//! 68      4     application_id
//! 72      20    reserved
//! 92      4     version_valid_for
//! 96      4     library_version
//! ```
//!
//! ## In-Header Size Trust
//!
//! The in-header page count is only trusted when it is nonzero and the
//! change counter equals the version-valid-for field; otherwise a writer
//! from before the size field existed (or a legacy tool) has touched the
//! file, and the count is recomputed as `ceil(file_len / page_size)`.
//!
//! ## Zerocopy Safety
//!
//! `RawHeader` derives `FromBytes`/`Immutable`/`KnownLayout`/`Unaligned`,
//! so it can be read in place from any 100-byte slice with no copying and
//! no alignment requirement. A compile-time assertion pins its size.

use zerocopy::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{Error, Result};

/// The 16-byte constant every database file begins with.
pub const MAGIC: &[u8; 16] = b"SQLite format 3\0";

pub const FILE_HEADER_SIZE: usize = 100;

/// Smallest permitted `page_size - reserved_bytes`.
pub const MIN_USABLE_SIZE: u32 = 480;

/// Text encoding for all TEXT values in a database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct RawHeader {
    magic: [u8; 16],
    page_size: U16,
    write_version: u8,
    read_version: u8,
    reserved_bytes: u8,
    max_embedded_frac: u8,
    min_embedded_frac: u8,
    leaf_frac: u8,
    change_counter: U32,
    page_count: U32,
    freelist_head: U32,
    freelist_count: U32,
    schema_cookie: U32,
    schema_format: U32,
    default_cache_size: U32,
    largest_root_page: U32,
    text_encoding: U32,
    user_version: U32,
    incremental_vacuum: U32,
    application_id: U32,
    reserved: [u8; 20],
    version_valid_for: U32,
    library_version: U32,
}

const _: () = assert!(std::mem::size_of::<RawHeader>() == FILE_HEADER_SIZE);

/// Validated, file-wide parameters parsed from the raw header.
#[derive(Debug, Clone)]
pub struct DbHeader {
    page_size: u32,
    reserved_bytes: u8,
    write_version: u8,
    read_version: u8,
    page_count: u32,
    text_encoding: TextEncoding,
    schema_format: u32,
    user_version: i32,
    application_id: i32,
    incremental_vacuum: bool,
    library_version: u32,
}

impl DbHeader {
    /// Parses and validates the first 100 bytes of a database file.
    ///
    /// `file_len` is the total length of the underlying source; it is used
    /// to recompute the page count when the in-header size is stale.
    pub fn parse(bytes: &[u8], file_len: u64) -> Result<Self> {
        if bytes.len() < FILE_HEADER_SIZE {
            return Err(Error::Truncated("file header"));
        }

        let raw = RawHeader::ref_from_bytes(&bytes[..FILE_HEADER_SIZE])
            .map_err(|_| Error::Truncated("file header"))?;

        if &raw.magic != MAGIC {
            return Err(Error::BadMagic);
        }

        if raw.read_version > 2 {
            return Err(Error::UnsupportedVersion(raw.read_version));
        }

        let page_size = match raw.page_size.get() {
            1 => 65536,
            n if n >= 512 && n.is_power_of_two() => u32::from(n),
            _ => return Err(Error::InvalidHeader("page size")),
        };

        if raw.max_embedded_frac != 64 || raw.min_embedded_frac != 32 || raw.leaf_frac != 32 {
            return Err(Error::InvalidHeader("payload fractions"));
        }

        if page_size - u32::from(raw.reserved_bytes) < MIN_USABLE_SIZE {
            return Err(Error::InvalidHeader("usable page size below minimum"));
        }

        let text_encoding = match raw.text_encoding.get() {
            1 => TextEncoding::Utf8,
            2 => TextEncoding::Utf16Le,
            3 => TextEncoding::Utf16Be,
            _ => return Err(Error::InvalidHeader("text encoding")),
        };

        // The in-header size is not authoritative when it is zero or when
        // the change counter and version-valid-for fields disagree.
        let mut page_count = raw.page_count.get();
        if page_count == 0 || raw.change_counter.get() != raw.version_valid_for.get() {
            page_count = file_len.div_ceil(u64::from(page_size)) as u32;
        }

        Ok(Self {
            page_size,
            reserved_bytes: raw.reserved_bytes,
            write_version: raw.write_version,
            read_version: raw.read_version,
            page_count,
            text_encoding,
            schema_format: raw.schema_format.get(),
            user_version: raw.user_version.get() as i32,
            application_id: raw.application_id.get() as i32,
            incremental_vacuum: raw.incremental_vacuum.get() != 0,
            library_version: raw.library_version.get(),
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn reserved_bytes(&self) -> u8 {
        self.reserved_bytes
    }

    /// Bytes of each page addressable by cell and payload machinery.
    pub fn usable_size(&self) -> u32 {
        self.page_size - u32::from(self.reserved_bytes)
    }

    pub fn write_version(&self) -> u8 {
        self.write_version
    }

    pub fn read_version(&self) -> u8 {
        self.read_version
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn text_encoding(&self) -> TextEncoding {
        self.text_encoding
    }

    pub fn schema_format(&self) -> u32 {
        self.schema_format
    }

    pub fn user_version(&self) -> i32 {
        self.user_version
    }

    pub fn application_id(&self) -> i32 {
        self.application_id
    }

    pub fn incremental_vacuum(&self) -> bool {
        self.incremental_vacuum
    }

    /// Version number of the library that last wrote the file.
    pub fn library_version(&self) -> u32 {
        self.library_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(page_size: u16, reserved: u8, page_count: u32) -> [u8; FILE_HEADER_SIZE] {
        let mut h = [0u8; FILE_HEADER_SIZE];
        h[..16].copy_from_slice(MAGIC);
        h[16..18].copy_from_slice(&page_size.to_be_bytes());
        h[18] = 1;
        h[19] = 1;
        h[20] = reserved;
        h[21] = 64;
        h[22] = 32;
        h[23] = 32;
        h[24..28].copy_from_slice(&7u32.to_be_bytes()); // change counter
        h[28..32].copy_from_slice(&page_count.to_be_bytes());
        h[44..48].copy_from_slice(&4u32.to_be_bytes()); // schema format
        h[56..60].copy_from_slice(&1u32.to_be_bytes()); // UTF-8
        h[92..96].copy_from_slice(&7u32.to_be_bytes()); // version valid for
        h[96..100].copy_from_slice(&3_046_001u32.to_be_bytes());
        h
    }

    #[test]
    fn parses_well_formed_header() {
        let bytes = header_bytes(4096, 0, 12);
        let header = DbHeader::parse(&bytes, 12 * 4096).unwrap();

        assert_eq!(header.page_size(), 4096);
        assert_eq!(header.usable_size(), 4096);
        assert_eq!(header.page_count(), 12);
        assert_eq!(header.text_encoding(), TextEncoding::Utf8);
        assert_eq!(header.schema_format(), 4);
        assert_eq!(header.library_version(), 3_046_001);
    }

    #[test]
    fn page_size_one_means_65536() {
        let bytes = header_bytes(1, 0, 2);
        let header = DbHeader::parse(&bytes, 2 * 65536).unwrap();
        assert_eq!(header.page_size(), 65536);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = header_bytes(4096, 0, 1);
        bytes[0] = b'X';
        assert!(matches!(
            DbHeader::parse(&bytes, 4096),
            Err(Error::BadMagic)
        ));
    }

    #[test]
    fn rejects_newer_read_version() {
        let mut bytes = header_bytes(4096, 0, 1);
        bytes[19] = 3;
        assert!(matches!(
            DbHeader::parse(&bytes, 4096),
            Err(Error::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn rejects_non_power_of_two_page_size() {
        let bytes = header_bytes(1000, 0, 1);
        assert!(matches!(
            DbHeader::parse(&bytes, 1000),
            Err(Error::InvalidHeader("page size"))
        ));
    }

    #[test]
    fn rejects_wrong_payload_fractions() {
        let mut bytes = header_bytes(4096, 0, 1);
        bytes[21] = 63;
        assert!(matches!(
            DbHeader::parse(&bytes, 4096),
            Err(Error::InvalidHeader("payload fractions"))
        ));
    }

    #[test]
    fn rejects_usable_size_below_minimum() {
        // 512-byte pages with 40 reserved bytes leave 472 usable.
        let bytes = header_bytes(512, 40, 1);
        assert!(matches!(
            DbHeader::parse(&bytes, 512),
            Err(Error::InvalidHeader("usable page size below minimum"))
        ));
    }

    #[test]
    fn rejects_unknown_text_encoding() {
        let mut bytes = header_bytes(4096, 0, 1);
        bytes[56..60].copy_from_slice(&5u32.to_be_bytes());
        assert!(matches!(
            DbHeader::parse(&bytes, 4096),
            Err(Error::InvalidHeader("text encoding"))
        ));
    }

    #[test]
    fn recomputes_page_count_when_zero() {
        let bytes = header_bytes(1024, 0, 0);
        let header = DbHeader::parse(&bytes, 1042 * 1024).unwrap();
        assert_eq!(header.page_count(), 1042);
    }

    #[test]
    fn recomputes_page_count_on_counter_mismatch() {
        let mut bytes = header_bytes(1024, 0, 5);
        bytes[92..96].copy_from_slice(&6u32.to_be_bytes()); // != change counter
        let header = DbHeader::parse(&bytes, 3 * 1024).unwrap();
        assert_eq!(header.page_count(), 3);
    }

    #[test]
    fn recomputed_count_rounds_up_partial_pages() {
        let bytes = header_bytes(1024, 0, 0);
        let header = DbHeader::parse(&bytes, 1500).unwrap();
        assert_eq!(header.page_count(), 2);
    }

    #[test]
    fn short_buffer_is_truncated() {
        let bytes = [0u8; 50];
        assert!(matches!(
            DbHeader::parse(&bytes, 50),
            Err(Error::Truncated("file header"))
        ));
    }
}
