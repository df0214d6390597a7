//! Storage access for FIT buffers.
//!
//! The codec works exclusively on `&[u8]`. This module is the thin layer that gets those
//! bytes from disk or memory and back: a [`Backend`] abstraction with an owned in-memory
//! buffer and a memory-mapped file implementation, the [`File`] wrapper around either, the
//! [`parser::Parser`] cursor and [`io`] helpers used by every decoder, and [`output::Output`]
//! for writing results.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fitscope::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("activity.fit"))?;
//! println!("{} bytes, header length {}", file.len(), file.data()[0]);
//! # Ok::<(), fitscope::Error>(())
//! ```

pub mod io;
pub mod output;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{Error::Empty, Result};
use memory::Memory;
use physical::Physical;

/// Source of the raw bytes of one file.
pub trait Backend: Send + Sync {
    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Borrow the complete data.
    fn data(&self) -> &[u8];

    /// Total length of the data.
    fn len(&self) -> usize;
}

/// Raw bytes of one input file, either mapped from disk or owned in memory.
pub struct File {
    data: Box<dyn Backend>,
}

impl File {
    /// Memory-map the file at `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened and
    /// [`crate::Error::Empty`] if it has no content.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Map an already opened file.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if the file has no content.
    pub fn from_std_file(file: std::fs::File) -> Result<File> {
        let input = Physical::from_std_file(file)?;

        Self::load(input)
    }

    /// Take ownership of an in-memory buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `data` is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        Ok(File {
            data: Box::new(data),
        })
    }

    /// Length of the file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the file holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the complete file content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the file.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    #[test]
    fn from_mem_rejects_empty() {
        assert!(matches!(File::from_mem(vec![]), Err(Error::Empty)));
    }

    #[test]
    fn from_mem_and_from_file_agree() {
        let bytes = vec![0x0C, 0x10, 0x6C, 0x08, 0, 0, 0, 0, b'.', b'F', b'I', b'T'];

        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(&bytes).unwrap();
        temp.flush().unwrap();

        let memory = File::from_mem(bytes.clone()).unwrap();
        let mapped = File::from_file(temp.path()).unwrap();

        assert_eq!(memory.data(), mapped.data());
        assert_eq!(mapped.len(), 12);
        assert!(!mapped.is_empty());
        assert_eq!(mapped.data_slice(8, 4).unwrap(), b".FIT");
    }

    #[test]
    fn from_std_file_rejects_empty() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let file = std::fs::File::open(temp.path()).unwrap();
        assert!(matches!(File::from_std_file(file), Err(Error::Empty)));
    }
}
