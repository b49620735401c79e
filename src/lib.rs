//! # rolite - Read-Only SQLite File Reader
//!
//! rolite decodes the SQLite on-disk file format directly: given a
//! database file it exposes the logical contents of tables and indexes as
//! iterable sequences of typed records. There is no SQL layer, no write
//! path, and no transaction machinery; the crate is the decoder stack and
//! nothing else.
//!
//! ## Quick Start
//!
//! ```ignore
//! let db = rolite::open("./chinook.db")?;
//!
//! for object in db.schema()? {
//!     println!("{} {} (root page {})", object.kind().as_str(), object.name(), object.root_page());
//! }
//!
//! db.for_each("Album", |record| {
//!     let title = record.value_at(1)?;
//!     println!("{:?} {}", record.rowid(), title);
//!     Ok(())
//! })?;
//! ```
//!
//! ## Architecture
//!
//! The decoder is layered, leaves first:
//!
//! ```text
//! +--------------------------------------+
//! |        Database (open, schema)       |
//! +--------------------------------------+
//! |  Object catalog  |  Record decoding  |
//! +------------------+-------------------+
//! |  B-tree nodes, cells, tree walker    |
//! +--------------------------------------+
//! |  Overflow chains    |  Varint codec  |
//! +--------------------------------------+
//! |  Pager over ByteSource (mmap / mem)  |
//! +--------------------------------------+
//! ```
//!
//! Pages are zero-copy slices of the underlying source; cell payloads
//! borrow from their page unless they spill onto overflow pages, in which
//! case they are stitched into an owned buffer. Decoded text and blob
//! values borrow from the payload in turn.
//!
//! ## Scope
//!
//! Free-list, rollback-journal, write-ahead-log, and pointer-map pages
//! are out of scope; encountering one as a tree node is `Unsupported`.
//! Files declaring UTF-16 text open, but reading a TEXT value from them
//! is `Unsupported`. Nothing is ever written.
//!
//! ## Module Overview
//!
//! - [`storage`]: byte sources, the pager, and the 100-byte file header
//! - [`btree`]: node decoding, cell decoding, overflow chains, traversal
//! - [`record`]: the record format and serial-type alphabet
//! - [`schema`]: the page-1 object catalog and column metadata
//! - [`database`]: the `Database` facade and its builder
//! - [`encoding`]: the 1..9-byte varint codec

pub mod btree;
pub mod database;
pub mod encoding;
pub mod error;
pub mod record;
pub mod schema;
pub mod storage;
pub mod types;

pub use database::{Database, DatabaseBuilder};
pub use error::{Error, Result};
pub use record::Record;
pub use schema::{Affinity, Column, Object, ObjectKind, TableOptions};
pub use storage::{ByteSource, MemSource, MmapSource, TextEncoding};
pub use types::Value;

use std::path::Path;

/// Opens and validates the database at `path` via a read-only memory
/// mapping.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Database<MmapSource>> {
    Database::open(path)
}
