//! Traversal and pattern search over the directory tree.
//!
//! Two query shapes are supported. A bare glob (`*.txt`, `file_?`) is matched
//! against child names, either one level deep or at every level. A segmented
//! pattern (`folder_1\sub*`) walks the tree one segment at a time; only the
//! final segment may carry wildcards.

use crate::error::{DiskError, Result};
use crate::ident::path::is_separator;
use crate::ident::{DirectoryIdentifier, FileIdentifier};
use crate::store::{DirectoryNode, DirectoryStore};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const WILDCARDS: &[char] = &['*', '?'];

/// Depth of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchOption {
    #[default]
    TopDirectoryOnly,
    AllDirectories,
}

/// Glob compiled to an anchored, case-insensitive regular expression.
///
/// `?` matches zero or one character, `*` matches any run (non-greedy).
/// Everything else is literal.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut expr = String::with_capacity(pattern.len() * 2 + 2);
        expr.push('^');
        for c in pattern.chars() {
            match c {
                '?' => expr.push_str(".?"),
                '*' => expr.push_str(".*?"),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
            }
        }
        expr.push('$');

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(true)
            .build()
            .map_err(|e| DiskError::InvalidArgument(format!("Invalid search pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

pub fn has_wildcards(segment: &str) -> bool {
    segment.contains(WILDCARDS)
}

fn is_segmented(pattern: &str) -> bool {
    pattern.contains(is_separator)
}

/// Split a segmented pattern, rejecting wildcards outside the final segment
fn segments(pattern: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = pattern.split(is_separator).collect();
    if let Some((_, intermediate)) = segments.split_last() {
        if intermediate.iter().any(|s| has_wildcards(s)) {
            return Err(DiskError::InvalidArgument(format!(
                "Illegal characters in path '{}'. Wildcards are only allowed in the last segment.",
                pattern
            )));
        }
    }
    Ok(segments)
}

/// Read-only walker over a directory container
pub struct Traversal<'a> {
    dirs: &'a DirectoryStore,
}

impl<'a> Traversal<'a> {
    pub fn new(dirs: &'a DirectoryStore) -> Self {
        Self { dirs }
    }

    /// Files under `dir` matching `pattern`
    pub fn files(
        &self,
        dir: &DirectoryNode,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Vec<FileIdentifier>> {
        if is_segmented(pattern) {
            let segments = segments(pattern)?;
            let (last, intermediate) = match segments.split_last() {
                Some(split) => split,
                None => return Ok(Vec::new()),
            };
            let current = self.descend(dir, intermediate)?;
            return self.files(current, last, SearchOption::TopDirectoryOnly);
        }

        let glob = GlobPattern::new(pattern)?;
        let mut result = Vec::new();
        self.collect_files(dir, &glob, option, &mut result)?;
        Ok(result)
    }

    /// Subdirectories under `dir` matching `pattern`
    pub fn directories(
        &self,
        dir: &DirectoryNode,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Vec<DirectoryIdentifier>> {
        if is_segmented(pattern) {
            let segments = segments(pattern)?;
            let (last, intermediate) = match segments.split_last() {
                Some(split) => split,
                None => return Ok(Vec::new()),
            };
            let current = self.descend(dir, intermediate)?;
            return self.directories(current, last, SearchOption::TopDirectoryOnly);
        }

        let glob = GlobPattern::new(pattern)?;
        let mut result = Vec::new();
        self.collect_directories(dir, &glob, option, &mut result)?;
        Ok(result)
    }

    /// Pre-order walk calling `visitor` on `dir` and every descendant directory.
    ///
    /// A listed child without a live node is corruption, not a recoverable miss.
    pub fn for_each<F>(&self, dir: &DirectoryNode, mut visitor: F) -> Result<()>
    where
        F: FnMut(&DirectoryNode) -> Result<()>,
    {
        self.walk(dir, &mut visitor)
    }

    fn walk<F>(&self, dir: &DirectoryNode, visitor: &mut F) -> Result<()>
    where
        F: FnMut(&DirectoryNode) -> Result<()>,
    {
        visitor(dir)?;
        for child in &dir.directories {
            let node = self.resolve(child)?;
            self.walk(node, visitor)?;
        }
        Ok(())
    }

    fn collect_files(
        &self,
        dir: &DirectoryNode,
        glob: &GlobPattern,
        option: SearchOption,
        out: &mut Vec<FileIdentifier>,
    ) -> Result<()> {
        out.extend(
            dir.files
                .iter()
                .filter(|f| glob.is_match(f.name().name()))
                .cloned(),
        );
        if option == SearchOption::TopDirectoryOnly {
            return Ok(());
        }
        for child in &dir.directories {
            let node = self.resolve(child)?;
            self.collect_files(node, glob, option, out)?;
        }
        Ok(())
    }

    fn collect_directories(
        &self,
        dir: &DirectoryNode,
        glob: &GlobPattern,
        option: SearchOption,
        out: &mut Vec<DirectoryIdentifier>,
    ) -> Result<()> {
        out.extend(
            dir.directories
                .iter()
                .filter(|d| glob.is_match(d.name()))
                .cloned(),
        );
        if option == SearchOption::TopDirectoryOnly {
            return Ok(());
        }
        for child in &dir.directories {
            let node = self.resolve(child)?;
            self.collect_directories(node, glob, option, out)?;
        }
        Ok(())
    }

    /// Follow literal intermediate segments; the first match at each level wins
    fn descend<'s>(
        &'s self,
        start: &'s DirectoryNode,
        intermediate: &[&str],
    ) -> Result<&'s DirectoryNode> {
        let mut current = start;
        for segment in intermediate {
            let found =
                self.directories(current, segment, SearchOption::TopDirectoryOnly)?;
            let next = found.first().ok_or_else(|| {
                DiskError::DirectoryNotFound(format!("{}{}", current.id, segment))
            })?;
            current = self.resolve(next)?;
        }
        Ok(current)
    }

    fn resolve(&self, id: &DirectoryIdentifier) -> Result<&'a DirectoryNode> {
        self.dirs.try_get(id).ok_or_else(|| {
            DiskError::corrupted(format!("failed to find directory node for {}", id))
        })
    }
}
