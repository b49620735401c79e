//! # Database Facade
//!
//! `Database` owns the byte source, the validated header, and the pager,
//! and hands out schema objects and tree walks. It is the only type most
//! callers touch:
//!
//! ```ignore
//! let db = rolite::open("chinook.db")?;
//! for object in db.schema()? {
//!     println!("{} {}", object.kind().as_str(), object.name());
//! }
//! db.for_each("Album", |record| {
//!     println!("{:?}", record.value_at(1)?);
//!     Ok(())
//! })?;
//! ```
//!
//! The reader is synchronous and blocking; all I/O happens on the calling
//! thread inside page reads. A `Database` may be shared across threads:
//! every operation takes `&self` and the underlying source is immutable.

mod builder;

pub use builder::DatabaseBuilder;

use std::path::Path;

use crate::btree::Tree;
use crate::error::Result;
use crate::schema::{catalog, Object};
use crate::storage::{
    ByteSource, DbHeader, MemSource, MmapSource, Pager, TextEncoding, FILE_HEADER_SIZE,
};

/// An open, read-only database file.
pub struct Database<S: ByteSource = MmapSource> {
    header: DbHeader,
    pager: Pager<S>,
    max_walk_depth: usize,
}

impl Database<MmapSource> {
    /// Opens and validates the database at `path` via a read-only memory
    /// mapping.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().open(path)
    }

    /// Returns a builder for configuring the open.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }
}

impl Database<MemSource> {
    /// Opens a database image held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        DatabaseBuilder::new().from_bytes(bytes)
    }
}

impl<S: ByteSource> Database<S> {
    pub(crate) fn from_source(source: S, max_walk_depth: Option<usize>) -> Result<Self> {
        let file_len = source.len();
        let header = DbHeader::parse(source.read_at(0, FILE_HEADER_SIZE)?, file_len)?;
        let pager = Pager::new(source, header.page_size(), header.page_count());
        let max_walk_depth = max_walk_depth.unwrap_or_else(|| header.page_count().max(1) as usize);

        tracing::debug!(
            page_size = header.page_size(),
            pages = header.page_count(),
            encoding = ?header.text_encoding(),
            "opened database"
        );

        Ok(Self {
            header,
            pager,
            max_walk_depth,
        })
    }

    pub fn header(&self) -> &DbHeader {
        &self.header
    }

    pub fn page_size(&self) -> u32 {
        self.header.page_size()
    }

    pub fn num_pages(&self) -> u32 {
        self.header.page_count()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.header.text_encoding()
    }

    /// Version number of the library that last wrote the file.
    pub fn library_version(&self) -> u32 {
        self.header.library_version()
    }

    /// The tree rooted at `root_page`, bounded by the configured walk
    /// depth.
    pub(crate) fn tree(&self, root_page: u32) -> Tree<'_, S> {
        Tree::new(
            &self.pager,
            self.header.usable_size(),
            root_page,
            self.max_walk_depth,
        )
    }

    /// All tables and indexes recorded in the schema, in physical order.
    pub fn schema(&self) -> Result<Vec<Object<'_, S>>> {
        catalog::read_schema(self)
    }

    /// The first schema object named `name`, or `NotFound`.
    pub fn object(&self, name: &str) -> Result<Object<'_, S>> {
        self.schema()?
            .into_iter()
            .find(|object| object.name() == name)
            .ok_or_else(|| crate::Error::NotFound(name.to_string()))
    }

    /// Convenience for `object(name)?.for_each(visit)`.
    pub fn for_each<F>(&self, name: &str, visit: F) -> Result<()>
    where
        F: FnMut(crate::record::Record<'_>) -> Result<()>,
    {
        self.object(name)?.for_each(visit)
    }
}
