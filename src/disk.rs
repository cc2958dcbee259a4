//! Entry point for callers: one in-memory disk with its drives mounted.

use crate::clock::{Clock, SystemClock};
use crate::config::DiskConfig;
use crate::driver::Driver;
use crate::error::Result;
use crate::handle::{DirectoryHandle, FileHandle};
use std::sync::Arc;
use tracing::info;

/// An in-memory disk.
///
/// Paths given as strings resolve against the configured working directory,
/// so `"notes\\a.txt"` and `"C:\\notes\\a.txt"` name the same file on a disk
/// whose working directory is `C:\`.
#[derive(Debug, Clone)]
pub struct Disk {
    driver: Driver,
}

impl Default for Disk {
    fn default() -> Self {
        Self::new()
    }
}

impl Disk {
    pub fn new() -> Self {
        Self {
            driver: Driver::new(),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            driver: Driver::with_clock(clock),
        }
    }

    pub fn from_config(config: &DiskConfig) -> Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &DiskConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let working_directory = config.working_directory()?;
        let drives = config.drive_roots()?;
        let driver = Driver::with_options(working_directory.clone(), clock);
        for drive in &drives {
            driver.mount(drive);
        }
        info!(
            working_directory = %working_directory,
            drives = drives.len(),
            "virtual disk ready"
        );
        Ok(Self { driver })
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn working_directory(&self) -> DirectoryHandle {
        self.driver
            .directory_handle(self.driver.working_directory().clone())
    }

    /// Handle for a file path; nothing is created
    pub fn file(&self, path: &str) -> Result<FileHandle> {
        self.driver.file(path)
    }

    /// Handle for a directory path; nothing is created
    pub fn directory(&self, path: &str) -> Result<DirectoryHandle> {
        self.driver.directory(path)
    }

    /// Create the file and any missing ancestors, or return the existing one
    pub fn create_file(&self, path: &str) -> Result<FileHandle> {
        let id = self.driver.resolve_file(path)?;
        self.driver.create_or_get_file(&id)
    }

    /// Create the directory and any missing ancestors, or return the existing one
    pub fn create_directory(&self, path: &str) -> Result<DirectoryHandle> {
        let id = self.driver.resolve_directory(path)?;
        self.driver.create_or_get_directory(&id)
    }
}
