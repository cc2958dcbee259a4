//! Path parsing and normalization.
//!
//! Paths use Windows conventions: `\` is the separator (`/` is accepted and
//! rewritten), roots are drive roots (`C:\`) or UNC shares (`\\server\share\`).
//! Relative paths and rooted paths without a drive (`\temp`) resolve against a
//! base directory.

use crate::error::{DiskError, Result};

pub const SEPARATOR: char = '\\';
pub const ALT_SEPARATOR: char = '/';

/// Base used when a relative path is resolved without an explicit directory.
pub const DEFAULT_ROOT: &str = "C:\\";

const INVALID_CHARS: &[char] = &['<', '>', '"', '|', '*', '?', ':', '\0'];

pub fn is_separator(c: char) -> bool {
    c == SEPARATOR || c == ALT_SEPARATOR
}

/// Fully resolved path: a root plus normal segments (no `.`, `..`, or empties)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub root: String,
    pub segments: Vec<String>,
}

impl ParsedPath {
    pub fn default_base() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            segments: Vec::new(),
        }
    }

    /// Normalized form: root followed by segments, always ending in a separator
    pub fn render(&self) -> String {
        let mut out = self.root.clone();
        for segment in &self.segments {
            out.push_str(segment);
            out.push(SEPARATOR);
        }
        out
    }
}

/// True for `X:` followed by a separator or nothing
pub fn is_drive_rooted(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}

pub fn is_unc(path: &str) -> bool {
    let mut chars = path.chars();
    matches!((chars.next(), chars.next()), (Some(a), Some(b)) if is_separator(a) && is_separator(b))
}

/// Resolve `path` against `base`, collapsing `.` and `..`.
pub fn resolve(base: &ParsedPath, path: &str) -> Result<ParsedPath> {
    if path.trim().is_empty() {
        return Err(DiskError::InvalidArgument("The path is empty.".to_string()));
    }

    let (root, mut segments, rest) = if is_unc(path) {
        let parts: Vec<&str> = path[2..].split(is_separator).collect();
        let server = parts.first().copied().unwrap_or_default();
        let share = parts.get(1).copied().unwrap_or_default();
        if server.is_empty() || share.is_empty() {
            return Err(DiskError::InvalidArgument(format!(
                "The UNC path '{}' should be of the form \\\\server\\share.",
                path
            )));
        }
        validate_segment(server, path)?;
        validate_segment(share, path)?;
        let root = format!("\\\\{}\\{}\\", server, share);
        let consumed = 2 + server.len() + 1 + share.len();
        let rest = path.get(consumed..).unwrap_or_default();
        (root, Vec::new(), rest)
    } else if is_drive_rooted(path) {
        // drive-relative forms (`c:temp`) are treated as rooted
        let root = format!("{}{}", &path[..2], SEPARATOR);
        (root, Vec::new(), &path[2..])
    } else if path.starts_with(is_separator) {
        (base.root.clone(), Vec::new(), path)
    } else {
        (base.root.clone(), base.segments.clone(), path)
    };

    for segment in rest.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => {
                validate_segment(name, path)?;
                segments.push(name.to_string());
            }
        }
    }

    Ok(ParsedPath { root, segments })
}

fn validate_segment(segment: &str, path: &str) -> Result<()> {
    if segment.contains(INVALID_CHARS) || segment.chars().any(char::is_control) {
        return Err(DiskError::InvalidArgument(format!(
            "Illegal characters in path '{}'.",
            path
        )));
    }
    Ok(())
}
