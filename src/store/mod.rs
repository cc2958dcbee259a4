//! Node Store
//!
//! Two keyed containers holding every live node: one for directories, one for
//! files. Nodes never reference each other directly; children are listed by
//! identifier and resolved back through the store.

pub mod node;

pub use node::{DirectoryNode, FileNode, TimeKind, Timestamps};

use crate::error::{DiskError, Result};
use crate::ident::{DirectoryIdentifier, FileIdentifier};
use crate::types::Timestamp;
use std::collections::HashMap;

/// Result of materializing a directory and its ancestor chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    /// True when at least one directory was created
    pub created: bool,
    /// The newly created suffix of the chain (root-most first), or the
    /// pre-existing leaf alone when nothing was created
    pub chain: Vec<DirectoryIdentifier>,
}

impl Materialized {
    /// The requested directory itself
    pub fn leaf(&self) -> Option<&DirectoryIdentifier> {
        self.chain.last()
    }
}

/// Container of directory nodes
#[derive(Debug, Default)]
pub struct DirectoryStore {
    nodes: HashMap<DirectoryIdentifier, DirectoryNode>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_get(&self, id: &DirectoryIdentifier) -> Option<&DirectoryNode> {
        self.nodes.get(id)
    }

    pub fn try_get_mut(&mut self, id: &DirectoryIdentifier) -> Option<&mut DirectoryNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &DirectoryIdentifier) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DirectoryIdentifier> {
        self.nodes.keys()
    }

    /// Returns true if the node was created
    pub fn add_or_get_single(&mut self, id: &DirectoryIdentifier, now: Timestamp) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }
        self.nodes
            .insert(id.clone(), DirectoryNode::new(id.clone(), now));
        true
    }

    /// Ensure every ancestor of `id` (root first) and `id` itself exist.
    ///
    /// Only the newly created suffix is reported, so callers know which nodes
    /// still need parent links and timestamps. Nodes are not linked here.
    pub fn add_or_get(&mut self, id: &DirectoryIdentifier, now: Timestamp) -> Materialized {
        let chain = id.split();
        let mut first_new = None;
        for (index, ancestor) in chain.iter().enumerate() {
            if self.add_or_get_single(ancestor, now) && first_new.is_none() {
                first_new = Some(index);
            }
        }

        match first_new {
            Some(index) => Materialized {
                created: true,
                chain: chain[index..].to_vec(),
            },
            None => Materialized {
                created: false,
                chain: vec![id.clone()],
            },
        }
    }

    pub fn remove(&mut self, id: &DirectoryIdentifier) -> Option<DirectoryNode> {
        self.nodes.remove(id)
    }

    /// Rekey: remove the node under `from` and reinsert a clone under `to`
    pub fn change(
        &mut self,
        from: &DirectoryIdentifier,
        to: &DirectoryIdentifier,
    ) -> Result<&mut DirectoryNode> {
        let node = self.nodes.remove(from).ok_or_else(|| {
            DiskError::corrupted(format!("failed to find directory node for {}", from))
        })?;
        let moved = node.clone_as(to.clone());
        self.nodes.insert(to.clone(), moved);
        self.nodes
            .get_mut(to)
            .ok_or_else(|| DiskError::corrupted(format!("rekey to {} was lost", to)))
    }
}

/// Container of file nodes
#[derive(Debug, Default)]
pub struct FileStore {
    nodes: HashMap<FileIdentifier, FileNode>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_get(&self, id: &FileIdentifier) -> Option<&FileNode> {
        self.nodes.get(id)
    }

    pub fn try_get_mut(&mut self, id: &FileIdentifier) -> Option<&mut FileNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &FileIdentifier) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FileIdentifier> {
        self.nodes.keys()
    }

    /// Returns whether the node is new, and the node
    pub fn add_or_get(&mut self, id: &FileIdentifier, now: Timestamp) -> (bool, &mut FileNode) {
        let mut created = false;
        let node = self.nodes.entry(id.clone()).or_insert_with(|| {
            created = true;
            FileNode::new(id.clone(), now)
        });
        (created, node)
    }

    pub fn remove(&mut self, id: &FileIdentifier) -> Option<FileNode> {
        self.nodes.remove(id)
    }

    /// Rekey: remove the node under `from` and reinsert a clone under `to`.
    /// The byte buffer is duplicated.
    pub fn change(&mut self, from: &FileIdentifier, to: &FileIdentifier) -> Result<&mut FileNode> {
        let node = self.nodes.remove(from).ok_or_else(|| {
            DiskError::corrupted(format!("failed to find file node for {}", from))
        })?;
        let moved = node.clone_as(to.clone());
        self.nodes.insert(to.clone(), moved);
        self.nodes
            .get_mut(to)
            .ok_or_else(|| DiskError::corrupted(format!("rekey to {} was lost", to)))
    }
}
