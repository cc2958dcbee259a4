//! Directory identifier: the hashable key for every directory lookup.

use super::file::{FileIdentifier, FileName};
use super::path::{self, ParsedPath, SEPARATOR};
use crate::error::Result;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical absolute directory path, compared case-insensitively.
///
/// The normalized form always ends with a separator (`c:\temp\`). Display
/// keeps the casing the path was first written with.
#[derive(Clone)]
pub struct DirectoryIdentifier {
    parsed: ParsedPath,
    id: String,
    key: String,
}

impl DirectoryIdentifier {
    /// Resolve `path` against the default base (`C:\`).
    pub fn new(path: &str) -> Result<Self> {
        Self::resolve_in(&ParsedPath::default_base(), path)
    }

    /// Resolve `path` relative to `base`. Absolute paths ignore the base.
    pub fn resolve(base: &DirectoryIdentifier, path: &str) -> Result<Self> {
        Self::resolve_in(&base.parsed, path)
    }

    fn resolve_in(base: &ParsedPath, path: &str) -> Result<Self> {
        let parsed = path::resolve(base, path)?;
        Ok(Self::from_parsed(parsed))
    }

    pub(crate) fn from_parsed(parsed: ParsedPath) -> Self {
        let id = parsed.render();
        let key = id.to_lowercase();
        Self { parsed, id, key }
    }

    pub(crate) fn parsed(&self) -> &ParsedPath {
        &self.parsed
    }

    /// Normalized path including the trailing separator
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Path without the trailing separator, except for roots (`c:\`)
    pub fn full_name(&self) -> String {
        if self.is_root() {
            self.id.clone()
        } else {
            self.id.trim_end_matches(SEPARATOR).to_string()
        }
    }

    /// Last segment, or the root itself
    pub fn name(&self) -> &str {
        self.parsed
            .segments
            .last()
            .map(String::as_str)
            .unwrap_or(&self.parsed.root)
    }

    pub fn segments(&self) -> &[String] {
        &self.parsed.segments
    }

    pub fn is_root(&self) -> bool {
        self.parsed.segments.is_empty()
    }

    pub fn parent(&self) -> Option<DirectoryIdentifier> {
        if self.is_root() {
            return None;
        }
        let mut parsed = self.parsed.clone();
        parsed.segments.pop();
        Some(Self::from_parsed(parsed))
    }

    pub fn root(&self) -> DirectoryIdentifier {
        Self::from_parsed(ParsedPath {
            root: self.parsed.root.clone(),
            segments: Vec::new(),
        })
    }

    /// Ancestor chain from the root down to `self`, inclusive
    pub fn split(&self) -> Vec<DirectoryIdentifier> {
        (0..=self.parsed.segments.len())
            .map(|depth| {
                Self::from_parsed(ParsedPath {
                    root: self.parsed.root.clone(),
                    segments: self.parsed.segments[..depth].to_vec(),
                })
            })
            .collect()
    }

    pub fn join_directory(&self, relative: &str) -> Result<DirectoryIdentifier> {
        Self::resolve(self, relative)
    }

    pub fn join_file(&self, relative: &str) -> Result<FileIdentifier> {
        FileIdentifier::resolve(self, relative)
    }

    /// Direct child directory; `name` must already be a valid single segment
    pub(crate) fn child(&self, name: &str) -> DirectoryIdentifier {
        let mut parsed = self.parsed.clone();
        parsed.segments.push(name.to_string());
        Self::from_parsed(parsed)
    }

    /// Segments of `self` below `ancestor`, or `None` if `ancestor` does not contain `self`
    pub fn relative_segments(&self, ancestor: &DirectoryIdentifier) -> Option<&[String]> {
        if self.parsed.root.to_lowercase() != ancestor.parsed.root.to_lowercase() {
            return None;
        }
        let depth = ancestor.parsed.segments.len();
        if depth > self.parsed.segments.len() {
            return None;
        }
        let prefix_matches = ancestor
            .parsed
            .segments
            .iter()
            .zip(&self.parsed.segments)
            .all(|(a, b)| a.to_lowercase() == b.to_lowercase());
        prefix_matches.then(|| &self.parsed.segments[depth..])
    }

    /// True when `other` is `self` or lies beneath it
    pub fn contains(&self, other: &DirectoryIdentifier) -> bool {
        other.relative_segments(self).is_some()
    }

    /// Re-root `self` from under `from` to under `to`
    pub(crate) fn rebase(
        &self,
        from: &DirectoryIdentifier,
        to: &DirectoryIdentifier,
    ) -> Option<DirectoryIdentifier> {
        let relative = self.relative_segments(from)?;
        let mut parsed = to.parsed.clone();
        parsed.segments.extend(relative.iter().cloned());
        Some(Self::from_parsed(parsed))
    }

    /// The same path read as a file; `None` for roots
    pub fn as_file(&self) -> Option<FileIdentifier> {
        let parent = self.parent()?;
        Some(FileIdentifier::new(parent, FileName::new(self.name())))
    }
}

impl PartialEq for DirectoryIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for DirectoryIdentifier {}

impl Hash for DirectoryIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for DirectoryIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for DirectoryIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DirectoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl fmt::Debug for DirectoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirectoryIdentifier({:?})", self.id)
    }
}
