//! # Memory-Mapped File Source
//!
//! This module implements `MmapSource`, the default byte source for
//! on-disk databases. The file is mapped read-only into the process
//! address space, so page reads are pointer arithmetic and the OS page
//! cache does the actual I/O.
//!
//! The mapping is never remapped or grown: the reader treats the file as
//! an immutable snapshot, which is what makes handing out `&[u8]` slices
//! across the whole decoder stack sound.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::{slice_at, ByteSource};
use crate::error::Result;

#[derive(Debug)]
pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    /// Opens `path` read-only and maps it into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        // SAFETY: Mmap::map is unsafe because the mapping becomes stale if
        // the file is modified externally. This is acceptable because:
        // 1. The file is opened read-only and this crate never writes it
        // 2. The reader's contract is a point-in-time snapshot; a database
        //    being rewritten concurrently is outside its supported use
        // 3. The mmap lifetime is tied to MmapSource, so no slice handed
        //    out by read_at can outlive the mapping
        let mmap = unsafe { Mmap::map(&file)? };

        Ok(Self { mmap })
    }
}

impl ByteSource for MmapSource {
    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read_at(&self, offset: u64, len: usize) -> Result<&[u8]> {
        slice_at(&self.mmap, offset, len, "file read")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn maps_and_reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();
        file.flush().unwrap();

        let source = MmapSource::open(file.path()).unwrap();
        assert_eq!(source.len(), 10);
        assert_eq!(source.read_at(2, 4).unwrap(), b"2345");
    }

    #[test]
    fn read_past_end_is_truncated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        let source = MmapSource::open(file.path()).unwrap();
        assert!(matches!(
            source.read_at(1, 10),
            Err(Error::Truncated("file read"))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = MmapSource::open("/no/such/database/file");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
