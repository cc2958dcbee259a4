//! vdisk: In-Memory Virtual Disk
//!
//! An in-memory emulation of a Windows-style hierarchical file store. Paths,
//! directories, files, timestamps, attributes and byte streams behave like a
//! real disk so that code written against it can be exercised without touching
//! physical storage.
//!
//! ```
//! use vdisk::{Disk, EntryInfo, SearchOption};
//!
//! let disk = Disk::new();
//! let file = disk.create_file("C:\\temp\\notes\\today.txt").unwrap();
//! file.write_all(b"hello").unwrap();
//!
//! let temp = disk.directory("c:\\TEMP").unwrap();
//! let found = temp.files("*.txt", SearchOption::AllDirectories).unwrap();
//! assert_eq!(found[0].full_name(), "C:\\temp\\notes\\today.txt");
//! assert_eq!(found[0].read_all().unwrap(), b"hello");
//! ```

pub mod clock;
pub mod config;
pub mod disk;
pub mod driver;
pub mod error;
pub mod handle;
pub mod ident;
pub mod logging;
pub mod search;
pub mod store;
pub mod stream;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crate::config::DiskConfig;
pub use disk::Disk;
pub use driver::Driver;
pub use error::{DiskError, Result};
pub use handle::{DirectoryHandle, Entry, EntryInfo, FileHandle};
pub use ident::{DirectoryIdentifier, FileIdentifier, FileName};
pub use logging::{init_logging, LoggingConfig};
pub use search::{GlobPattern, SearchOption};
pub use store::{TimeKind, Timestamps};
pub use stream::StreamProxy;
pub use types::{Attributes, FileAccess, FileShare, OpenMode, Timestamp};
