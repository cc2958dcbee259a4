//! File identifier: owning directory plus file name.

use super::directory::DirectoryIdentifier;
use super::path::{self, is_separator, ParsedPath};
use crate::error::{DiskError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Final path segment, compared case-insensitively
#[derive(Clone)]
pub struct FileName {
    name: String,
    key: String,
}

impl FileName {
    /// Keeps only the final segment of `name`
    pub fn new(name: &str) -> Self {
        let name = name.rsplit(is_separator).next().unwrap_or_default().to_string();
        let key = name.to_lowercase();
        Self { name, key }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the extension
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[..dot],
            None => &self.name,
        }
    }

    /// Extension including the leading dot, or empty
    pub fn extension(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) if dot + 1 < self.name.len() => &self.name[dot..],
            _ => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl PartialEq for FileName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FileName {}

impl Hash for FileName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileName({:?})", self.name)
    }
}

/// Structural pair of owning directory and file name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FileIdentifier {
    directory: DirectoryIdentifier,
    name: FileName,
}

impl FileIdentifier {
    pub fn new(directory: DirectoryIdentifier, name: FileName) -> Self {
        Self { directory, name }
    }

    /// Resolve `path` against the default base (`C:\`).
    pub fn from_path(path: &str) -> Result<Self> {
        Self::from_parsed(path::resolve(&ParsedPath::default_base(), path)?, path)
    }

    pub fn resolve(base: &DirectoryIdentifier, path: &str) -> Result<Self> {
        Self::from_parsed(path::resolve(base.parsed(), path)?, path)
    }

    fn from_parsed(mut parsed: ParsedPath, original: &str) -> Result<Self> {
        let name = parsed.segments.pop().ok_or_else(|| {
            DiskError::InvalidArgument(format!("'{}' does not name a file.", original))
        })?;
        Ok(Self {
            directory: DirectoryIdentifier::from_parsed(parsed),
            name: FileName::new(&name),
        })
    }

    pub fn directory(&self) -> &DirectoryIdentifier {
        &self.directory
    }

    pub fn name(&self) -> &FileName {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}{}", self.directory.as_str(), self.name.name())
    }

    /// The same path read as a directory
    pub fn as_directory(&self) -> DirectoryIdentifier {
        self.directory.child(self.name.name())
    }

    /// Re-root the owning directory from under `from` to under `to`
    pub(crate) fn rebase(
        &self,
        from: &DirectoryIdentifier,
        to: &DirectoryIdentifier,
    ) -> Option<FileIdentifier> {
        let directory = self.directory.rebase(from, to)?;
        Some(Self::new(directory, self.name.clone()))
    }
}

impl fmt::Display for FileIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.directory.as_str(), self.name.name())
    }
}

impl fmt::Debug for FileIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileIdentifier({:?})", self.full_name())
    }
}
