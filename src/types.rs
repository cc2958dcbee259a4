//! Core value types shared across the virtual disk.

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp: all node times are kept in UTC
pub type Timestamp = DateTime<Utc>;

bitflags! {
    /// File and directory attribute flags (Windows layout)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Attributes: u32 {
        const READ_ONLY     = 0x0001;
        const HIDDEN        = 0x0002;
        const SYSTEM        = 0x0004;
        const DIRECTORY     = 0x0010;
        const ARCHIVE       = 0x0020;
        const DEVICE        = 0x0040;
        const NORMAL        = 0x0080;
        const TEMPORARY     = 0x0100;
        const SPARSE_FILE   = 0x0200;
        const REPARSE_POINT = 0x0400;
        const COMPRESSED    = 0x0800;
        const OFFLINE       = 0x1000;
        const NOT_INDEXED   = 0x2000;
        const ENCRYPTED     = 0x4000;
    }
}

/// How an open call treats an existing or missing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMode {
    /// Create a new file; fail if it exists
    CreateNew,
    /// Create or truncate
    Create,
    /// Open an existing file; fail if missing
    Open,
    OpenOrCreate,
    /// Open an existing file and truncate it to zero length
    Truncate,
    /// Open or create, positioned at end of stream. Requires write-only access.
    Append,
}

/// Access requested on an open stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileAccess {
    Read,
    Write,
    ReadWrite,
}

impl FileAccess {
    pub fn can_read(self) -> bool {
        matches!(self, FileAccess::Read | FileAccess::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, FileAccess::Write | FileAccess::ReadWrite)
    }
}

/// Sharing mode. Recorded on the stream only; there is no multi-process access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileShare {
    #[default]
    None,
    Read,
    Write,
    ReadWrite,
    Delete,
}
