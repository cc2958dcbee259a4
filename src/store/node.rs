//! Directory and file node representation

use crate::ident::{DirectoryIdentifier, FileIdentifier};
use crate::types::{Attributes, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;

/// Creation, last-write and last-access times of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub creation: Timestamp,
    pub last_write: Timestamp,
    pub last_access: Timestamp,
}

impl Timestamps {
    pub fn at(now: Timestamp) -> Self {
        Self {
            creation: now,
            last_write: now,
            last_access: now,
        }
    }

    /// Refresh last-write and last-access, leaving creation alone
    pub fn touch(&mut self, now: Timestamp) {
        self.last_write = now;
        self.last_access = now;
    }
}

/// Which of the three timestamps an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeKind {
    Creation,
    LastWrite,
    LastAccess,
}

impl Timestamps {
    pub fn get(&self, kind: TimeKind) -> Timestamp {
        match kind {
            TimeKind::Creation => self.creation,
            TimeKind::LastWrite => self.last_write,
            TimeKind::LastAccess => self.last_access,
        }
    }

    pub fn set(&mut self, kind: TimeKind, time: Timestamp) {
        match kind {
            TimeKind::Creation => self.creation = time,
            TimeKind::LastWrite => self.last_write = time,
            TimeKind::LastAccess => self.last_access = time,
        }
    }
}

/// One live directory: its children (in insertion order) and metadata
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    pub id: DirectoryIdentifier,
    pub files: Vec<FileIdentifier>,
    pub directories: Vec<DirectoryIdentifier>,
    pub attributes: Attributes,
    pub times: Timestamps,
}

impl DirectoryNode {
    pub fn new(id: DirectoryIdentifier, now: Timestamp) -> Self {
        Self {
            id,
            files: Vec::new(),
            directories: Vec::new(),
            attributes: Attributes::DIRECTORY,
            times: Timestamps::at(now),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Same children and metadata under a new identifier
    pub fn clone_as(&self, id: DirectoryIdentifier) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    pub(crate) fn unlink_file(&mut self, id: &FileIdentifier) {
        self.files.retain(|f| f != id);
    }

    pub(crate) fn unlink_directory(&mut self, id: &DirectoryIdentifier) {
        self.directories.retain(|d| d != id);
    }

    pub(crate) fn link_file(&mut self, id: FileIdentifier) {
        if !self.files.contains(&id) {
            self.files.push(id);
        }
    }

    pub(crate) fn link_directory(&mut self, id: DirectoryIdentifier) {
        if !self.directories.contains(&id) {
            self.directories.push(id);
        }
    }
}

/// One live file: its canonical byte buffer (the sink) and metadata
#[derive(Debug, Clone)]
pub struct FileNode {
    pub id: FileIdentifier,
    pub content: Cursor<Vec<u8>>,
    pub attributes: Attributes,
    pub read_only: bool,
    pub times: Timestamps,
    pub metadata: BTreeMap<String, String>,
}

impl FileNode {
    pub fn new(id: FileIdentifier, now: Timestamp) -> Self {
        Self {
            id,
            content: Cursor::new(Vec::new()),
            attributes: Attributes::NORMAL,
            read_only: false,
            times: Timestamps::at(now),
            metadata: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> u64 {
        self.content.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.get_ref().is_empty()
    }

    /// Empty the sink and rewind it
    pub fn truncate(&mut self) {
        self.content.get_mut().clear();
        self.content.set_position(0);
    }

    /// Duplicate under a new identifier. The buffer is copied and rewound;
    /// timestamps, attributes and metadata carry over.
    pub fn clone_as(&self, id: FileIdentifier) -> Self {
        Self {
            id,
            content: Cursor::new(self.content.get_ref().clone()),
            attributes: self.attributes,
            read_only: self.read_only,
            times: self.times,
            metadata: self.metadata.clone(),
        }
    }
}
