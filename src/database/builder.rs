//! # Database Builder
//!
//! Fluent configuration for opening a database. The only tunable today is
//! the tree-walk depth bound, which defaults to the declared page count
//! (an upper bound on the height of any well-formed tree); lowering it
//! caps the work a hostile file can cause before the walk fails with
//! `Corruption`.

use std::path::Path;

use super::Database;
use crate::error::Result;
use crate::storage::{MemSource, MmapSource};

pub struct DatabaseBuilder {
    max_walk_depth: Option<usize>,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self {
            max_walk_depth: None,
        }
    }

    /// Overrides the tree-walk depth bound.
    pub fn max_walk_depth(mut self, depth: usize) -> Self {
        self.max_walk_depth = Some(depth);
        self
    }

    /// Opens the database at `path` via a read-only memory mapping.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<Database<MmapSource>> {
        Database::from_source(MmapSource::open(path)?, self.max_walk_depth)
    }

    /// Opens a database image held in memory.
    pub fn from_bytes(self, bytes: Vec<u8>) -> Result<Database<MemSource>> {
        Database::from_source(MemSource::new(bytes), self.max_walk_depth)
    }
}
