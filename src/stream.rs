//! Write-back stream proxy.
//!
//! Every open hands out a [`StreamProxy`] holding a private copy of the file's
//! bytes. Reads, writes and seeks touch only that copy. On release (drop or
//! [`StreamProxy::close`]) the copy replaces the file's canonical buffer, and
//! if anything was written or resized the file's last-write and last-access
//! times are refreshed.

use crate::driver::Driver;
use crate::error::Result;
use crate::ident::FileIdentifier;
use crate::types::{FileAccess, FileShare};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use tracing::warn;

/// Largest buffer a stream will grow to
pub const MAX_STREAM_LEN: u64 = i32::MAX as u64;

pub struct StreamProxy {
    driver: Driver,
    id: FileIdentifier,
    local: Cursor<Vec<u8>>,
    access: FileAccess,
    share: FileShare,
    modified: bool,
    released: bool,
}

impl StreamProxy {
    pub(crate) fn new(
        driver: Driver,
        id: FileIdentifier,
        bytes: Vec<u8>,
        position: u64,
        access: FileAccess,
        share: FileShare,
    ) -> Self {
        let mut local = Cursor::new(bytes);
        local.set_position(position);
        Self {
            driver,
            id,
            local,
            access,
            share,
            modified: false,
            released: false,
        }
    }

    pub fn id(&self) -> &FileIdentifier {
        &self.id
    }

    pub fn access(&self) -> FileAccess {
        self.access
    }

    pub fn share(&self) -> FileShare {
        self.share
    }

    pub fn can_read(&self) -> bool {
        self.access.can_read()
    }

    pub fn can_write(&self) -> bool {
        self.access.can_write()
    }

    pub fn len(&self) -> u64 {
        self.local.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.local.get_ref().is_empty()
    }

    pub fn position(&self) -> u64 {
        self.local.position()
    }

    /// True once a write or resize has happened in this session
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Truncate or zero-extend the local buffer. The position is not moved.
    pub fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.require_write()?;
        let len = checked_len(len)?;
        self.local.get_mut().resize(len, 0);
        self.modified = true;
        Ok(())
    }

    /// Release the proxy, reporting write-back failures instead of logging them
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.driver
            .write_back(&self.id, self.local.get_ref(), self.modified)
    }

    fn require_read(&self) -> io::Result<()> {
        if !self.can_read() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("stream for '{}' was not opened for reading", self.id),
            ));
        }
        Ok(())
    }

    fn require_write(&self) -> io::Result<()> {
        if !self.can_write() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("stream for '{}' was not opened for writing", self.id),
            ));
        }
        Ok(())
    }
}

fn checked_len(len: u64) -> io::Result<usize> {
    if len > MAX_STREAM_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("stream length {} exceeds {}", len, MAX_STREAM_LEN),
        ));
    }
    usize::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length out of range"))
}

impl Read for StreamProxy {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.require_read()?;
        self.local.read(buf)
    }
}

impl Write for StreamProxy {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.require_write()?;
        let end = self.position().saturating_add(buf.len() as u64);
        checked_len(end)?;
        let written = self.local.write(buf)?;
        self.modified = true;
        Ok(written)
    }

    /// Push the local buffer into the file without touching timestamps
    fn flush(&mut self) -> io::Result<()> {
        self.driver
            .write_back(&self.id, self.local.get_ref(), false)
            .map_err(io::Error::from)
    }
}

impl Seek for StreamProxy {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.local.seek(pos)
    }
}

impl Drop for StreamProxy {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(path = %self.id, error = %e, "dropping stream write-back");
        }
    }
}

impl std::fmt::Debug for StreamProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamProxy")
            .field("id", &self.id)
            .field("access", &self.access)
            .field("len", &self.len())
            .field("position", &self.position())
            .field("modified", &self.modified)
            .finish()
    }
}
