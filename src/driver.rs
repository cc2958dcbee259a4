//! Filesystem Engine
//!
//! The driver owns the node store and is the only code that mutates it. It
//! enforces ancestor auto-creation, timestamp propagation and the error
//! taxonomy. Handles and stream proxies hold a cheap clone of the driver and
//! call back into it for every property read.

use crate::clock::{Clock, SystemClock};
use crate::error::{DiskError, Result};
use crate::handle::{DirectoryHandle, FileHandle, HandleRegistry};
use crate::ident::path::{self, ParsedPath};
use crate::ident::{DirectoryIdentifier, FileIdentifier};
use crate::search::{SearchOption, Traversal};
use crate::store::{
    DirectoryNode, DirectoryStore, FileNode, FileStore, Materialized, TimeKind, Timestamps,
};
use crate::stream::StreamProxy;
use crate::types::{Attributes, FileAccess, FileShare, OpenMode, Timestamp};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// All live nodes
#[derive(Debug, Default)]
struct DiskState {
    dirs: DirectoryStore,
    files: FileStore,
}

impl DiskState {
    fn find_dir(&self, id: &DirectoryIdentifier) -> Result<&DirectoryNode> {
        self.dirs
            .try_get(id)
            .ok_or_else(|| DiskError::DirectoryNotFound(id.full_name()))
    }

    fn find_dir_mut(&mut self, id: &DirectoryIdentifier) -> Result<&mut DirectoryNode> {
        self.dirs
            .try_get_mut(id)
            .ok_or_else(|| DiskError::DirectoryNotFound(id.full_name()))
    }

    /// Missing owning directory and missing file are distinct errors
    fn find_file(&self, id: &FileIdentifier) -> Result<&FileNode> {
        if !self.dirs.contains(id.directory()) {
            return Err(DiskError::DirectoryNotFound(id.full_name()));
        }
        self.files
            .try_get(id)
            .ok_or_else(|| DiskError::FileNotFound(id.full_name()))
    }

    fn find_file_mut(&mut self, id: &FileIdentifier) -> Result<&mut FileNode> {
        if !self.dirs.contains(id.directory()) {
            return Err(DiskError::DirectoryNotFound(id.full_name()));
        }
        self.files
            .try_get_mut(id)
            .ok_or_else(|| DiskError::FileNotFound(id.full_name()))
    }

    fn names_file(&self, id: &DirectoryIdentifier) -> bool {
        id.as_file().is_some_and(|f| self.files.contains(&f))
    }

    /// Refuse to materialize a directory chain through an existing file
    fn ensure_no_file_in_chain(&self, id: &DirectoryIdentifier) -> Result<()> {
        for ancestor in id.split() {
            if !self.dirs.contains(&ancestor) && self.names_file(&ancestor) {
                return Err(DiskError::AlreadyExists(format!(
                    "Cannot create \"{}\" because a file with the same name already exists.",
                    ancestor.full_name()
                )));
            }
        }
        Ok(())
    }

    /// Create missing ancestors of `id`, wire parent links, and stamp the new nodes
    fn materialize(&mut self, id: &DirectoryIdentifier, now: Timestamp) -> Result<Materialized> {
        self.ensure_no_file_in_chain(id)?;
        let materialized = self.dirs.add_or_get(id, now);
        if !materialized.created {
            return Ok(materialized);
        }

        let chain = &materialized.chain;
        if let Some(anchor) = chain.first().and_then(DirectoryIdentifier::parent) {
            let parent = self.dirs.try_get_mut(&anchor).ok_or_else(|| {
                DiskError::corrupted(format!("missing ancestor {} after materialization", anchor))
            })?;
            parent.link_directory(chain[0].clone());
            parent.times.touch(now);
        }
        for pair in chain.windows(2) {
            let node = self.dirs.try_get_mut(&pair[0]).ok_or_else(|| {
                DiskError::corrupted(format!("missing {} after materialization", pair[0]))
            })?;
            node.link_directory(pair[1].clone());
        }
        for created in chain {
            if let Some(node) = self.dirs.try_get_mut(created) {
                node.times = Timestamps::at(now);
            }
        }
        Ok(materialized)
    }
}

struct DriverInner {
    state: RwLock<DiskState>,
    handles: Mutex<HandleRegistry>,
    clock: Arc<dyn Clock>,
    working_directory: DirectoryIdentifier,
}

/// Shared handle to one in-memory disk. Clones address the same store.
#[derive(Clone)]
pub struct Driver {
    inner: Arc<DriverInner>,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    /// Driver on the wall clock with `C:\` as working directory
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_options(
            DirectoryIdentifier::from_parsed(ParsedPath::default_base()),
            clock,
        )
    }

    /// The working directory's drive root is materialized immediately.
    pub fn with_options(working_directory: DirectoryIdentifier, clock: Arc<dyn Clock>) -> Self {
        let mut state = DiskState::default();
        state.dirs.add_or_get_single(&working_directory.root(), clock.now());
        Self {
            inner: Arc::new(DriverInner {
                state: RwLock::new(state),
                handles: Mutex::new(HandleRegistry::default()),
                clock,
                working_directory,
            }),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.inner.clock.now()
    }

    pub fn working_directory(&self) -> &DirectoryIdentifier {
        &self.inner.working_directory
    }

    /// Resolve a file path against the working directory
    pub fn resolve_file(&self, path: &str) -> Result<FileIdentifier> {
        FileIdentifier::resolve(&self.inner.working_directory, path)
    }

    /// Resolve a directory path against the working directory
    pub fn resolve_directory(&self, path: &str) -> Result<DirectoryIdentifier> {
        DirectoryIdentifier::resolve(&self.inner.working_directory, path)
    }

    /// Make sure a drive or share root exists
    pub fn mount(&self, root: &DirectoryIdentifier) -> DirectoryHandle {
        let root = root.root();
        let now = self.now();
        if self.inner.state.write().dirs.add_or_get_single(&root, now) {
            debug!(root = %root, "mounted root");
        }
        self.directory_handle(root)
    }

    pub fn file_handle(&self, id: FileIdentifier) -> FileHandle {
        let cell = self.inner.handles.lock().file_cell(id);
        FileHandle::new(self.clone(), cell)
    }

    pub fn directory_handle(&self, id: DirectoryIdentifier) -> DirectoryHandle {
        let cell = self.inner.handles.lock().directory_cell(id);
        DirectoryHandle::new(self.clone(), cell)
    }

    /// Handle for a path resolved against the working directory. Nothing is created.
    pub fn file(&self, path: &str) -> Result<FileHandle> {
        Ok(self.file_handle(self.resolve_file(path)?))
    }

    pub fn directory(&self, path: &str) -> Result<DirectoryHandle> {
        Ok(self.directory_handle(self.resolve_directory(path)?))
    }

    pub fn exists_file(&self, id: &FileIdentifier) -> bool {
        self.inner.state.read().files.contains(id)
    }

    pub fn exists_directory(&self, id: &DirectoryIdentifier) -> bool {
        self.inner.state.read().dirs.contains(id)
    }

    pub fn directory_count(&self) -> usize {
        self.inner.state.read().dirs.len()
    }

    pub fn file_count(&self) -> usize {
        self.inner.state.read().files.len()
    }

    // --- creation ---

    pub fn create_or_get_file(&self, id: &FileIdentifier) -> Result<FileHandle> {
        {
            let mut state = self.inner.state.write();
            if state.dirs.contains(&id.as_directory()) {
                return Err(DiskError::AlreadyExists(format!(
                    "Cannot create \"{}\" because a directory with the same name already exists.",
                    id.full_name()
                )));
            }
            if !state.files.contains(id) {
                let now = self.now();
                state.materialize(id.directory(), now)?;
                let owner = state.find_dir_mut(id.directory())?;
                owner.link_file(id.clone());
                owner.times.touch(now);
                state.files.add_or_get(id, now);
                debug!(path = %id, "created file");
            }
        }
        Ok(self.file_handle(id.clone()))
    }

    pub fn create_or_get_directory(&self, id: &DirectoryIdentifier) -> Result<DirectoryHandle> {
        {
            let mut state = self.inner.state.write();
            if state.names_file(id) {
                return Err(DiskError::AlreadyExists(format!(
                    "Cannot create \"{}\" because a file or directory with the same name already exists.",
                    id.full_name()
                )));
            }
            let materialized = state.materialize(id, self.now())?;
            if materialized.created {
                debug!(path = %id, created = materialized.chain.len(), "created directory chain");
            }
        }
        Ok(self.directory_handle(id.clone()))
    }

    /// Create `relative` beneath `base`. Rooted paths and paths escaping `base`
    /// are argument errors.
    pub fn create_subdirectory(
        &self,
        base: &DirectoryIdentifier,
        relative: &str,
    ) -> Result<DirectoryHandle> {
        if path::is_drive_rooted(relative) || path::is_unc(relative) {
            return Err(DiskError::InvalidArgument(format!(
                "Path '{}' must not be a drive or UNC name.",
                relative
            )));
        }
        let target = base.join_directory(relative)?;
        if !base.contains(&target) {
            return Err(DiskError::InvalidArgument(format!(
                "The directory specified, '{}', is not a subdirectory of '{}'.",
                relative,
                base.full_name()
            )));
        }
        self.create_or_get_directory(&target)
    }

    // --- streams ---

    pub fn open(
        &self,
        id: &FileIdentifier,
        mode: OpenMode,
        access: FileAccess,
        share: FileShare,
    ) -> Result<StreamProxy> {
        validate_open(mode, access)?;

        let mut state = self.inner.state.write();
        if !state.dirs.contains(id.directory()) {
            return Err(DiskError::DirectoryNotFound(id.full_name()));
        }
        if state.dirs.contains(&id.as_directory()) {
            return Err(DiskError::Unauthorized(id.full_name()));
        }

        if let Some(node) = state.files.try_get_mut(id) {
            match mode {
                OpenMode::CreateNew => {
                    return Err(DiskError::AlreadyExists(format!(
                        "The file '{}' already exists.",
                        id.full_name()
                    )));
                }
                OpenMode::Create | OpenMode::Truncate => node.truncate(),
                _ => {}
            }
            let bytes = node.content.get_ref().clone();
            let position = match mode {
                OpenMode::Append => bytes.len() as u64,
                _ => node.content.position(),
            };
            debug!(path = %id, ?mode, ?access, "opened file");
            return Ok(StreamProxy::new(
                self.clone(),
                id.clone(),
                bytes,
                position,
                access,
                share,
            ));
        }

        if matches!(mode, OpenMode::Open | OpenMode::Truncate) {
            return Err(DiskError::FileNotFound(id.full_name()));
        }

        let now = self.now();
        state.files.add_or_get(id, now);
        let owner = state.find_dir_mut(id.directory())?;
        owner.link_file(id.clone());
        owner.times.touch(now);
        debug!(path = %id, ?mode, ?access, "created file on open");

        Ok(StreamProxy::new(
            self.clone(),
            id.clone(),
            Vec::new(),
            0,
            access,
            share,
        ))
    }

    /// Replace the file's sink with `bytes`, restoring the sink position
    /// clamped to the new length. `touch` refreshes last-write/last-access.
    pub(crate) fn write_back(&self, id: &FileIdentifier, bytes: &[u8], touch: bool) -> Result<()> {
        let now = self.now();
        let mut state = self.inner.state.write();
        let node = state
            .files
            .try_get_mut(id)
            .ok_or_else(|| DiskError::FileNotFound(id.full_name()))?;
        let position = node.content.position();
        node.content = Cursor::new(bytes.to_vec());
        node.content.set_position(position.min(bytes.len() as u64));
        if touch {
            node.times.touch(now);
        }
        Ok(())
    }

    // --- metadata ---

    pub fn length(&self, id: &FileIdentifier) -> Result<u64> {
        Ok(self.inner.state.read().find_file(id)?.len())
    }

    /// A missing file reports read-only
    pub fn is_read_only(&self, id: &FileIdentifier) -> bool {
        self.inner
            .state
            .read()
            .files
            .try_get(id)
            .map(|node| node.read_only)
            .unwrap_or(true)
    }

    pub fn set_read_only(&self, id: &FileIdentifier, value: bool) -> Result<()> {
        let mut state = self.inner.state.write();
        let node = state.find_file_mut(id)?;
        node.read_only = value;
        node.attributes.set(Attributes::READ_ONLY, value);
        Ok(())
    }

    pub fn file_attributes(&self, id: &FileIdentifier) -> Result<Attributes> {
        Ok(self.inner.state.read().find_file(id)?.attributes)
    }

    pub fn set_file_attributes(&self, id: &FileIdentifier, attributes: Attributes) -> Result<()> {
        let mut state = self.inner.state.write();
        let node = state.find_file_mut(id)?;
        node.attributes = attributes;
        node.read_only = attributes.contains(Attributes::READ_ONLY);
        Ok(())
    }

    pub fn directory_attributes(&self, id: &DirectoryIdentifier) -> Result<Attributes> {
        Ok(self.inner.state.read().find_dir(id)?.attributes)
    }

    pub fn set_directory_attributes(
        &self,
        id: &DirectoryIdentifier,
        attributes: Attributes,
    ) -> Result<()> {
        self.inner.state.write().find_dir_mut(id)?.attributes = attributes;
        Ok(())
    }

    pub fn file_times(&self, id: &FileIdentifier) -> Result<Timestamps> {
        Ok(self.inner.state.read().find_file(id)?.times)
    }

    pub fn set_file_time(&self, id: &FileIdentifier, kind: TimeKind, time: Timestamp) -> Result<()> {
        self.inner.state.write().find_file_mut(id)?.times.set(kind, time);
        Ok(())
    }

    pub fn directory_times(&self, id: &DirectoryIdentifier) -> Result<Timestamps> {
        Ok(self.inner.state.read().find_dir(id)?.times)
    }

    pub fn set_directory_time(
        &self,
        id: &DirectoryIdentifier,
        kind: TimeKind,
        time: Timestamp,
    ) -> Result<()> {
        self.inner.state.write().find_dir_mut(id)?.times.set(kind, time);
        Ok(())
    }

    pub fn metadata(&self, id: &FileIdentifier) -> Result<BTreeMap<String, String>> {
        Ok(self.inner.state.read().find_file(id)?.metadata.clone())
    }

    /// Returns the previous value under `key`
    pub fn set_metadata(
        &self,
        id: &FileIdentifier,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        let mut state = self.inner.state.write();
        Ok(state.find_file_mut(id)?.metadata.insert(key.into(), value.into()))
    }

    pub fn remove_metadata(&self, id: &FileIdentifier, key: &str) -> Result<Option<String>> {
        let mut state = self.inner.state.write();
        Ok(state.find_file_mut(id)?.metadata.remove(key))
    }

    // --- deletion ---

    /// No-op for a missing file; the owning directory must exist
    pub fn delete_file(&self, id: &FileIdentifier) -> Result<()> {
        let mut state = self.inner.state.write();
        if state.dirs.contains(&id.as_directory()) {
            return Err(DiskError::Unauthorized(id.full_name()));
        }
        if !state.dirs.contains(id.directory()) {
            return Err(DiskError::DirectoryNotFound(id.full_name()));
        }
        if state.files.remove(id).is_none() {
            return Ok(());
        }

        let now = self.now();
        let owner = state.dirs.try_get_mut(id.directory()).ok_or_else(|| {
            DiskError::corrupted(format!("cannot find owning directory {}", id.directory()))
        })?;
        owner.unlink_file(id);
        owner.times.touch(now);
        debug!(path = %id, "deleted file");
        Ok(())
    }

    pub fn delete_directory(&self, id: &DirectoryIdentifier, recurse: bool) -> Result<()> {
        let mut state = self.inner.state.write();
        let dir = state.find_dir(id)?;
        let parent_id = id
            .parent()
            .ok_or_else(|| DiskError::RootRemoval(id.full_name()))?;
        if !state.dirs.contains(&parent_id) {
            return Err(DiskError::corrupted(format!(
                "failed to find directory node for {}",
                parent_id
            )));
        }

        let mut file_ids = Vec::new();
        let mut dir_ids = vec![id.clone()];
        if recurse {
            Traversal::new(&state.dirs).for_each(dir, |node| {
                file_ids.extend(node.files.iter().cloned());
                dir_ids.extend(node.directories.iter().cloned());
                Ok(())
            })?;
        } else if !dir.is_empty() {
            return Err(DiskError::NotEmpty(id.full_name()));
        }

        let now = self.now();
        let parent = state.find_dir_mut(&parent_id)?;
        parent.unlink_directory(id);
        parent.times.touch(now);

        for file in &file_ids {
            state.files.remove(file);
        }
        for dir in &dir_ids {
            state.dirs.remove(dir);
        }
        debug!(
            path = %id,
            recurse,
            directories = dir_ids.len(),
            files = file_ids.len(),
            "deleted directory"
        );
        Ok(())
    }

    // --- copy and move ---

    /// Duplicate `source` into `target`. The destination gets fresh timestamps;
    /// the source is untouched.
    pub fn copy_file(
        &self,
        source: &FileIdentifier,
        target: &FileIdentifier,
        overwrite: bool,
    ) -> Result<FileHandle> {
        {
            let mut state = self.inner.state.write();
            let bytes = state.find_file(source)?.content.get_ref().clone();

            if state.dirs.contains(&target.as_directory()) {
                return Err(DiskError::AlreadyExists(format!(
                    "The target file \"{}\" is a directory, not a file.",
                    target.full_name()
                )));
            }
            if !state.dirs.contains(target.directory()) {
                return Err(DiskError::DirectoryNotFound(target.full_name()));
            }
            if state.files.contains(target) && (!overwrite || source == target) {
                return Err(DiskError::AlreadyExists(format!(
                    "The file '{}' already exists.",
                    target.full_name()
                )));
            }

            let now = self.now();
            let (_, node) = state.files.add_or_get(target, now);
            node.content = Cursor::new(bytes);
            node.times = Timestamps::at(now);
            state.find_dir_mut(target.directory())?.link_file(target.clone());
            debug!(source = %source, target = %target, overwrite, "copied file");
        }
        Ok(self.file_handle(target.clone()))
    }

    /// Rekey `source` to `target`, preserving timestamps and attributes.
    /// Identifiers equal up to case rename in place.
    pub fn move_file(&self, source: &FileIdentifier, target: &FileIdentifier) -> Result<()> {
        {
            let mut state = self.inner.state.write();
            state.find_file(source)?;
            if source != target
                && (state.files.contains(target) || state.dirs.contains(&target.as_directory()))
            {
                return Err(DiskError::AlreadyExists(
                    "Cannot create a file when that file already exists.".to_string(),
                ));
            }
            if !state.dirs.contains(target.directory()) {
                return Err(DiskError::DirectoryNotFound(target.full_name()));
            }

            state.files.change(source, target)?;
            state.find_dir_mut(source.directory())?.unlink_file(source);
            state.find_dir_mut(target.directory())?.link_file(target.clone());
            debug!(source = %source, target = %target, "moved file");
        }
        self.inner.handles.lock().file_moved(source, target);
        Ok(())
    }

    /// Move a whole subtree. Every descendant path is taken relative to the
    /// source and re-rooted under the target, so depth needs no special casing.
    pub fn move_directory(
        &self,
        source: &DirectoryIdentifier,
        target: &DirectoryIdentifier,
    ) -> Result<()> {
        if source == target {
            return Ok(());
        }

        let mut dir_moves = Vec::new();
        let mut file_moves = Vec::new();
        {
            let mut state = self.inner.state.write();
            let source_node = state.find_dir(source)?;
            let source_parent = source
                .parent()
                .ok_or_else(|| DiskError::RootRemoval(source.full_name()))?;
            let target_parent = target.parent().ok_or_else(|| {
                DiskError::InvalidArgument(format!(
                    "Cannot move '{}' onto the root '{}'.",
                    source.full_name(),
                    target.full_name()
                ))
            })?;
            state.find_dir(&target_parent)?;
            if state.dirs.contains(target) || state.names_file(target) {
                return Err(DiskError::AlreadyExists(
                    "Cannot create a file when that file already exists.".to_string(),
                ));
            }
            if source.contains(target) {
                return Err(DiskError::InvalidArgument(format!(
                    "Cannot move '{}' into its own subdirectory '{}'.",
                    source.full_name(),
                    target.full_name()
                )));
            }

            // new child lists per node, still keyed by the old identifiers
            let mut plan: Vec<(DirectoryIdentifier, Vec<DirectoryIdentifier>, Vec<FileIdentifier>)> =
                Vec::new();
            Traversal::new(&state.dirs).for_each(source_node, |node| {
                let mut dirs = Vec::with_capacity(node.directories.len());
                for child in &node.directories {
                    let moved = child.rebase(source, target).ok_or_else(|| {
                        DiskError::corrupted(format!("{} is not beneath {}", child, source))
                    })?;
                    dir_moves.push((child.clone(), moved.clone()));
                    dirs.push(moved);
                }
                let mut files = Vec::with_capacity(node.files.len());
                for child in &node.files {
                    let moved = child.rebase(source, target).ok_or_else(|| {
                        DiskError::corrupted(format!("{} is not beneath {}", child, source))
                    })?;
                    file_moves.push((child.clone(), moved.clone()));
                    files.push(moved);
                }
                plan.push((node.id.clone(), dirs, files));
                Ok(())
            })?;

            state
                .dirs
                .try_get_mut(&source_parent)
                .ok_or_else(|| {
                    DiskError::corrupted(format!("cannot find parent {} of {}", source_parent, source))
                })?
                .unlink_directory(source);

            for (id, dirs, files) in plan {
                let node = state.dirs.try_get_mut(&id).ok_or_else(|| {
                    DiskError::corrupted(format!("failed to find directory node for {}", id))
                })?;
                node.directories = dirs;
                node.files = files;
            }

            state.dirs.change(source, target)?;
            for (from, to) in &dir_moves {
                state.dirs.change(from, to)?;
            }
            for (from, to) in &file_moves {
                state.files.change(from, to)?;
            }

            state.find_dir_mut(&target_parent)?.link_directory(target.clone());
            debug!(
                source = %source,
                target = %target,
                directories = dir_moves.len() + 1,
                files = file_moves.len(),
                "moved directory"
            );
        }

        let mut handles = self.inner.handles.lock();
        handles.directory_moved(source, target);
        for (from, to) in &dir_moves {
            handles.directory_moved(from, to);
        }
        for (from, to) in &file_moves {
            handles.file_moved(from, to);
        }
        Ok(())
    }

    // --- enumeration ---

    pub fn file_ids(
        &self,
        dir: &DirectoryIdentifier,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Vec<FileIdentifier>> {
        let state = self.inner.state.read();
        let node = state.find_dir(dir)?;
        Traversal::new(&state.dirs).files(node, pattern, option)
    }

    pub fn directory_ids(
        &self,
        dir: &DirectoryIdentifier,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Vec<DirectoryIdentifier>> {
        let state = self.inner.state.read();
        let node = state.find_dir(dir)?;
        Traversal::new(&state.dirs).directories(node, pattern, option)
    }

    pub fn get_files(
        &self,
        dir: &DirectoryIdentifier,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Vec<FileHandle>> {
        let ids = self.file_ids(dir, pattern, option)?;
        Ok(ids.into_iter().map(|id| self.file_handle(id)).collect())
    }

    pub fn get_directories(
        &self,
        dir: &DirectoryIdentifier,
        pattern: &str,
        option: SearchOption,
    ) -> Result<Vec<DirectoryHandle>> {
        let ids = self.directory_ids(dir, pattern, option)?;
        Ok(ids.into_iter().map(|id| self.directory_handle(id)).collect())
    }

    /// Check the store invariants: parent/child links agree with the
    /// containers and no path names both a file and a directory.
    pub fn verify(&self) -> Result<()> {
        let state = self.inner.state.read();
        for id in state.dirs.ids() {
            let node = state.find_dir(id)?;
            for child in &node.directories {
                if !state.dirs.contains(child) {
                    return Err(DiskError::corrupted(format!("{} lists missing {}", id, child)));
                }
            }
            for child in &node.files {
                if !state.files.contains(child) {
                    return Err(DiskError::corrupted(format!("{} lists missing {}", id, child)));
                }
            }
            if let Some(parent) = id.parent() {
                let listed = state
                    .dirs
                    .try_get(&parent)
                    .is_some_and(|p| p.directories.contains(id));
                if !listed {
                    return Err(DiskError::corrupted(format!("{} is not linked to its parent", id)));
                }
            }
            if state.names_file(id) {
                return Err(DiskError::corrupted(format!("{} is both file and directory", id)));
            }
        }
        for id in state.files.ids() {
            let listed = state
                .dirs
                .try_get(id.directory())
                .is_some_and(|d| d.files.contains(id));
            if !listed {
                return Err(DiskError::corrupted(format!("{} is an orphan file", id)));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("working_directory", &self.inner.working_directory)
            .field("directories", &self.directory_count())
            .field("files", &self.file_count())
            .finish()
    }
}

fn validate_open(mode: OpenMode, access: FileAccess) -> Result<()> {
    if mode == OpenMode::Append && access != FileAccess::Write {
        return Err(DiskError::InvalidArgument(
            "Append access can be requested only in write-only mode.".to_string(),
        ));
    }
    if access == FileAccess::Read
        && matches!(mode, OpenMode::Create | OpenMode::CreateNew | OpenMode::Truncate)
    {
        return Err(DiskError::InvalidArgument(format!(
            "Combining FileMode: {:?} with FileAccess: Read is invalid.",
            mode
        )));
    }
    Ok(())
}
