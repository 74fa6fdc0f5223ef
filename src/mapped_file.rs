//! File lifecycle: opening the backing file, extending its length on
//! growth, mapping/unmapping it, flushing on close, and the cross-process
//! advisory lock (spec §4.1 item 6, §5).
//!
//! `MappedFile` is the single owner of the live `mmap` region. Individual
//! [`crate::Filter`] values never cache a pointer into it — they borrow
//! `mem()`/`mem_mut()` at each call, so a growth's unmap-then-remap cannot
//! leave a stale reference dangling (spec §9, "growth unmaps then remaps").

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::FileExt;
use memmap2::MmapMut;
use tracing::{debug, trace};

use crate::error::{Error, Result};

pub struct MappedFile {
    path: PathBuf,
    file: File,
    mmap: Option<MmapMut>,
    len: u64,
    locked: bool,
}

impl MappedFile {
    /// Open (creating if necessary) the file at `path`, acquire its
    /// advisory write lock, and map its current contents.
    ///
    /// Fails with [`Error::FileLocked`] if another live filter already
    /// holds the lock.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|source| Error::File {
                path: path.clone(),
                source,
            })?;

        file.try_lock_exclusive().map_err(|_| Error::FileLocked {
            path: path.clone(),
        })?;

        let len = file
            .metadata()
            .map_err(|source| Error::File {
                path: path.clone(),
                source,
            })?
            .len();

        debug!(path = %path.display(), len, "opened backing file");

        let mut mapped = Self {
            path,
            file,
            mmap: None,
            len,
            locked: true,
        };
        mapped.remap()?;
        Ok(mapped)
    }

    /// Current length of the backing file, equal to the sum of every live
    /// filter's `byte_width` (spec invariant 5).
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extend the file by `additional` bytes and return the offset at
    /// which the new region begins (the previous file length).
    ///
    /// Unmaps, truncates, then remaps the whole file, per the growth
    /// protocol in spec §4.5.
    pub fn extend(&mut self, additional: u64) -> Result<u64> {
        self.unmap()?;

        let old_len = self.len;
        let new_len = old_len + additional;
        self.file.set_len(new_len).map_err(|source| Error::File {
            path: self.path.clone(),
            source,
        })?;
        self.len = new_len;

        trace!(path = %self.path.display(), old_len, new_len, "extended backing file");

        self.remap()?;
        Ok(old_len)
    }

    /// Truncate the file down to `new_len` bytes (used by `Clear`, which
    /// discards every generation but the first).
    pub fn truncate_to(&mut self, new_len: u64) -> Result<()> {
        self.unmap()?;
        self.file.set_len(new_len).map_err(|source| Error::File {
            path: self.path.clone(),
            source,
        })?;
        self.len = new_len;
        self.remap()
    }

    fn remap(&mut self) -> Result<()> {
        if self.len == 0 {
            self.mmap = None;
            return Ok(());
        }
        // SAFETY: the file is exclusively locked for the lifetime of this
        // mapping, and no other `MappedFile` in this process maps the same
        // path (enforced by the advisory lock at `open`).
        let mmap = unsafe { MmapMut::map_mut(&self.file) }.map_err(|source| Error::File {
            path: self.path.clone(),
            source,
        })?;
        self.mmap = Some(mmap);
        Ok(())
    }

    fn unmap(&mut self) -> Result<()> {
        if let Some(mmap) = self.mmap.take() {
            mmap.flush().map_err(|source| Error::File {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Flush the mapped region to disk without unmapping it.
    pub fn flush(&self) -> Result<()> {
        if let Some(mmap) = &self.mmap {
            mmap.flush().map_err(|source| Error::File {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn mem(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn mem_mut(&mut self) -> &mut [u8] {
        self.mmap.as_deref_mut().unwrap_or(&mut [])
    }

    /// Flush, unmap, and release the advisory lock. After this call the
    /// file handle is closed; the `MappedFile` must not be used again.
    pub fn close(&mut self) -> Result<()> {
        self.unmap()?;
        if self.locked {
            let _ = FileExt::unlock(&self.file);
            self.locked = false;
        }
        debug!(path = %self.path.display(), "closed backing file");
        Ok(())
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
