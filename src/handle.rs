//! File and directory handles.
//!
//! A handle holds nothing but its identifier and a driver clone; every
//! property read goes back through the driver. The registry hands out one
//! shared identifier cell per path while any handle for it is alive, so a
//! move performed through any route is visible to every live handle.

use crate::driver::Driver;
use crate::error::Result;
use crate::ident::{DirectoryIdentifier, FileIdentifier};
use crate::search::SearchOption;
use crate::store::{TimeKind, Timestamps};
use crate::stream::StreamProxy;
use crate::types::{Attributes, FileAccess, FileShare, OpenMode, Timestamp};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};
use std::sync::{Arc, Weak};

type Cell<T> = Arc<RwLock<T>>;

/// Live identifier cells, keyed by the identifier they currently hold
#[derive(Debug, Default)]
pub(crate) struct HandleRegistry {
    files: HashMap<FileIdentifier, Weak<RwLock<FileIdentifier>>>,
    directories: HashMap<DirectoryIdentifier, Weak<RwLock<DirectoryIdentifier>>>,
}

impl HandleRegistry {
    pub(crate) fn file_cell(&mut self, id: FileIdentifier) -> Cell<FileIdentifier> {
        if let Some(cell) = self.files.get(&id).and_then(Weak::upgrade) {
            return cell;
        }
        self.files.retain(|_, weak| weak.strong_count() > 0);
        let cell = Arc::new(RwLock::new(id.clone()));
        self.files.insert(id, Arc::downgrade(&cell));
        cell
    }

    pub(crate) fn directory_cell(&mut self, id: DirectoryIdentifier) -> Cell<DirectoryIdentifier> {
        if let Some(cell) = self.directories.get(&id).and_then(Weak::upgrade) {
            return cell;
        }
        self.directories.retain(|_, weak| weak.strong_count() > 0);
        let cell = Arc::new(RwLock::new(id.clone()));
        self.directories.insert(id, Arc::downgrade(&cell));
        cell
    }

    pub(crate) fn file_moved(&mut self, from: &FileIdentifier, to: &FileIdentifier) {
        if let Some(cell) = self.files.remove(from).and_then(|weak| weak.upgrade()) {
            *cell.write() = to.clone();
            self.files.insert(to.clone(), Arc::downgrade(&cell));
        }
    }

    pub(crate) fn directory_moved(&mut self, from: &DirectoryIdentifier, to: &DirectoryIdentifier) {
        if let Some(cell) = self.directories.remove(from).and_then(|weak| weak.upgrade()) {
            *cell.write() = to.clone();
            self.directories.insert(to.clone(), Arc::downgrade(&cell));
        }
    }

    #[cfg(test)]
    fn live(&self) -> usize {
        self.files.values().filter(|w| w.strong_count() > 0).count()
            + self
                .directories
                .values()
                .filter(|w| w.strong_count() > 0)
                .count()
    }
}

/// Capabilities shared by files and directories
pub trait EntryInfo {
    fn full_name(&self) -> String;
    fn name(&self) -> String;
    fn exists(&self) -> bool;
    fn attributes(&self) -> Result<Attributes>;
    fn set_attributes(&self, attributes: Attributes) -> Result<()>;
    fn times(&self) -> Result<Timestamps>;
    fn set_time(&self, kind: TimeKind, time: Timestamp) -> Result<()>;

    fn creation_time(&self) -> Result<Timestamp> {
        Ok(self.times()?.creation)
    }

    fn last_write_time(&self) -> Result<Timestamp> {
        Ok(self.times()?.last_write)
    }

    fn last_access_time(&self) -> Result<Timestamp> {
        Ok(self.times()?.last_access)
    }
}

/// Handle to a file path, whether or not the file exists
#[derive(Clone)]
pub struct FileHandle {
    driver: Driver,
    cell: Cell<FileIdentifier>,
}

impl FileHandle {
    pub(crate) fn new(driver: Driver, cell: Cell<FileIdentifier>) -> Self {
        Self { driver, cell }
    }

    /// Current identifier; changes when the file or an ancestor is moved
    pub fn id(&self) -> FileIdentifier {
        self.cell.read().clone()
    }

    pub fn extension(&self) -> String {
        self.cell.read().name().extension().to_string()
    }

    pub fn length(&self) -> Result<u64> {
        self.driver.length(&self.id())
    }

    pub fn is_read_only(&self) -> bool {
        self.driver.is_read_only(&self.id())
    }

    pub fn set_read_only(&self, value: bool) -> Result<()> {
        self.driver.set_read_only(&self.id(), value)
    }

    pub fn metadata(&self) -> Result<BTreeMap<String, String>> {
        self.driver.metadata(&self.id())
    }

    pub fn set_metadata(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        self.driver.set_metadata(&self.id(), key, value)
    }

    pub fn remove_metadata(&self, key: &str) -> Result<Option<String>> {
        self.driver.remove_metadata(&self.id(), key)
    }

    pub fn directory(&self) -> DirectoryHandle {
        let directory = self.cell.read().directory().clone();
        self.driver.directory_handle(directory)
    }

    pub fn open(&self, mode: OpenMode, access: FileAccess, share: FileShare) -> Result<StreamProxy> {
        self.driver.open(&self.id(), mode, access, share)
    }

    /// Create or truncate, read-write
    pub fn create(&self) -> Result<StreamProxy> {
        self.open(OpenMode::Create, FileAccess::ReadWrite, FileShare::None)
    }

    pub fn open_read(&self) -> Result<StreamProxy> {
        self.open(OpenMode::Open, FileAccess::Read, FileShare::Read)
    }

    pub fn open_write(&self) -> Result<StreamProxy> {
        self.open(OpenMode::OpenOrCreate, FileAccess::Write, FileShare::None)
    }

    pub fn append(&self) -> Result<StreamProxy> {
        self.open(OpenMode::Append, FileAccess::Write, FileShare::None)
    }

    pub fn read_all(&self) -> Result<Vec<u8>> {
        let mut stream = self.open_read()?;
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        stream.close()?;
        Ok(bytes)
    }

    /// Replace the whole content, creating the file if needed
    pub fn write_all(&self, bytes: &[u8]) -> Result<()> {
        let mut stream = self.open(OpenMode::Create, FileAccess::Write, FileShare::None)?;
        stream.write_all(bytes)?;
        stream.close()
    }

    pub fn copy_to(&self, target: &str, overwrite: bool) -> Result<FileHandle> {
        let target = self.driver.resolve_file(target)?;
        self.driver.copy_file(&self.id(), &target, overwrite)
    }

    pub fn move_to(&self, target: &str) -> Result<()> {
        let target = self.driver.resolve_file(target)?;
        self.driver.move_file(&self.id(), &target)
    }

    pub fn delete(&self) -> Result<()> {
        self.driver.delete_file(&self.id())
    }
}

impl EntryInfo for FileHandle {
    fn full_name(&self) -> String {
        self.cell.read().full_name()
    }

    fn name(&self) -> String {
        self.cell.read().name().name().to_string()
    }

    fn exists(&self) -> bool {
        self.driver.exists_file(&self.id())
    }

    fn attributes(&self) -> Result<Attributes> {
        self.driver.file_attributes(&self.id())
    }

    fn set_attributes(&self, attributes: Attributes) -> Result<()> {
        self.driver.set_file_attributes(&self.id(), attributes)
    }

    fn times(&self) -> Result<Timestamps> {
        self.driver.file_times(&self.id())
    }

    fn set_time(&self, kind: TimeKind, time: Timestamp) -> Result<()> {
        self.driver.set_file_time(&self.id(), kind, time)
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell) || self.id() == other.id()
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FileHandle").field(&*self.cell.read()).finish()
    }
}

/// Handle to a directory path, whether or not the directory exists
#[derive(Clone)]
pub struct DirectoryHandle {
    driver: Driver,
    cell: Cell<DirectoryIdentifier>,
}

impl DirectoryHandle {
    pub(crate) fn new(driver: Driver, cell: Cell<DirectoryIdentifier>) -> Self {
        Self { driver, cell }
    }

    pub fn id(&self) -> DirectoryIdentifier {
        self.cell.read().clone()
    }

    pub fn create(&self) -> Result<()> {
        self.driver.create_or_get_directory(&self.id()).map(|_| ())
    }

    pub fn create_subdirectory(&self, relative: &str) -> Result<DirectoryHandle> {
        self.driver.create_subdirectory(&self.id(), relative)
    }

    pub fn delete(&self, recurse: bool) -> Result<()> {
        self.driver.delete_directory(&self.id(), recurse)
    }

    pub fn move_to(&self, target: &str) -> Result<()> {
        let target = self.driver.resolve_directory(target)?;
        self.driver.move_directory(&self.id(), &target)
    }

    /// Handle for `relative` beneath this directory; nothing is created
    pub fn file(&self, relative: &str) -> Result<FileHandle> {
        let id = self.cell.read().join_file(relative)?;
        Ok(self.driver.file_handle(id))
    }

    pub fn files(&self, pattern: &str, option: SearchOption) -> Result<Vec<FileHandle>> {
        self.driver.get_files(&self.id(), pattern, option)
    }

    pub fn directories(&self, pattern: &str, option: SearchOption) -> Result<Vec<DirectoryHandle>> {
        self.driver.get_directories(&self.id(), pattern, option)
    }

    /// Matching directories followed by matching files
    pub fn entries(&self, pattern: &str, option: SearchOption) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .directories(pattern, option)?
            .into_iter()
            .map(Entry::Directory)
            .collect();
        entries.extend(self.files(pattern, option)?.into_iter().map(Entry::File));
        Ok(entries)
    }

    /// `None` for drive and share roots
    pub fn parent(&self) -> Option<DirectoryHandle> {
        let parent = self.cell.read().parent()?;
        Some(self.driver.directory_handle(parent))
    }

    pub fn root(&self) -> DirectoryHandle {
        let root = self.cell.read().root();
        self.driver.directory_handle(root)
    }
}

impl EntryInfo for DirectoryHandle {
    fn full_name(&self) -> String {
        self.cell.read().full_name()
    }

    fn name(&self) -> String {
        self.cell.read().name().to_string()
    }

    fn exists(&self) -> bool {
        self.driver.exists_directory(&self.id())
    }

    fn attributes(&self) -> Result<Attributes> {
        self.driver.directory_attributes(&self.id())
    }

    fn set_attributes(&self, attributes: Attributes) -> Result<()> {
        self.driver.set_directory_attributes(&self.id(), attributes)
    }

    fn times(&self) -> Result<Timestamps> {
        self.driver.directory_times(&self.id())
    }

    fn set_time(&self, kind: TimeKind, time: Timestamp) -> Result<()> {
        self.driver.set_directory_time(&self.id(), kind, time)
    }
}

impl PartialEq for DirectoryHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell) || self.id() == other.id()
    }
}

impl std::fmt::Debug for DirectoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DirectoryHandle").field(&*self.cell.read()).finish()
    }
}

/// Either kind of handle, as returned by mixed enumeration
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    File(FileHandle),
    Directory(DirectoryHandle),
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Entry::File(file) => Some(file),
            Entry::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryHandle> {
        match self {
            Entry::Directory(dir) => Some(dir),
            Entry::File(_) => None,
        }
    }

    fn info(&self) -> &dyn EntryInfo {
        match self {
            Entry::File(file) => file as &dyn EntryInfo,
            Entry::Directory(dir) => dir as &dyn EntryInfo,
        }
    }
}

impl EntryInfo for Entry {
    fn full_name(&self) -> String {
        self.info().full_name()
    }

    fn name(&self) -> String {
        self.info().name()
    }

    fn exists(&self) -> bool {
        self.info().exists()
    }

    fn attributes(&self) -> Result<Attributes> {
        self.info().attributes()
    }

    fn set_attributes(&self, attributes: Attributes) -> Result<()> {
        self.info().set_attributes(attributes)
    }

    fn times(&self) -> Result<Timestamps> {
        self.info().times()
    }

    fn set_time(&self, kind: TimeKind, time: Timestamp) -> Result<()> {
        self.info().set_time(kind, time)
    }
}
