//! Memory-mapped output file for writing a serialized FIT buffer to disk.
//!
//! The target file is created at its final size up front and mapped writable. Until
//! [`Output::finalize`] succeeds the file counts as incomplete: dropping an unfinalized
//! [`Output`] deletes it, so a failed write never leaves a half-written activity behind.

use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};

use crate::{Error, Result};

/// A writable memory mapping of a target file.
pub struct Output {
    mmap: Option<MmapMut>,

    target_path: PathBuf,

    finalized: bool,
}

impl Output {
    /// Create (or truncate) `target_path` with exactly `size` bytes and map it.
    ///
    /// A zero `size` creates an empty file without a mapping.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be created, sized or mapped.
    pub fn create<P: AsRef<Path>>(target_path: P, size: u64) -> Result<Self> {
        let target_path = target_path.as_ref().to_path_buf();

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target_path)?;

        file.set_len(size)?;

        let mmap = if size == 0 {
            None
        } else {
            Some(unsafe { MmapOptions::new().map_mut(&file)? })
        };

        Ok(Self {
            mmap,
            target_path,
            finalized: false,
        })
    }

    /// Copy `data` into the mapping at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the write would exceed the file size.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let Some(mmap) = self.mmap.as_mut() else {
            return Err(Error::OutOfBounds);
        };

        let Some(end) = offset.checked_add(data.len()) else {
            return Err(Error::OutOfBounds);
        };
        if end > mmap.len() {
            return Err(Error::OutOfBounds);
        }

        mmap[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Size of the target file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.mmap.as_ref().map_or(0, |mmap| mmap.len() as u64)
    }

    /// Flush the mapping and keep the file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if flushing fails; the file is then removed on drop.
    pub fn finalize(mut self) -> Result<()> {
        if let Some(mmap) = self.mmap.as_ref() {
            mmap.flush()?;
        }

        self.finalized = true;
        Ok(())
    }

    /// Path of the file being written.
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        if !self.finalized {
            // Release the mapping before removing the file
            self.mmap = None;
            let _ = std::fs::remove_file(&self.target_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finalized_output_is_kept() {
        let temp_dir = tempdir().unwrap();
        let target_path = temp_dir.path().join("out.fit");

        let mut output = Output::create(&target_path, 4).unwrap();
        assert_eq!(output.size(), 4);
        output.write_at(0, &[0x0E, 0x10]).unwrap();
        output.write_at(2, &[0xAA, 0xBB]).unwrap();
        output.finalize().unwrap();

        assert_eq!(
            std::fs::read(&target_path).unwrap(),
            vec![0x0E, 0x10, 0xAA, 0xBB]
        );
    }

    #[test]
    fn unfinalized_output_is_removed() {
        let temp_dir = tempdir().unwrap();
        let target_path = temp_dir.path().join("partial.fit");

        {
            let mut output = Output::create(&target_path, 8).unwrap();
            output.write_at(0, &[1, 2, 3]).unwrap();
            assert!(target_path.exists());
        }

        assert!(!target_path.exists());
    }

    #[test]
    fn write_past_end_fails() {
        let temp_dir = tempdir().unwrap();
        let mut output = Output::create(temp_dir.path().join("small.fit"), 2).unwrap();

        assert!(matches!(
            output.write_at(1, &[0, 0]),
            Err(Error::OutOfBounds)
        ));
        assert!(output.write_at(usize::MAX, &[0]).is_err());
    }
}
