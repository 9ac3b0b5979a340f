// crates/testutils-vfs/src/memory.rs
// ============================================================================
// Module: In-Memory Filesystem
// Description: Mutex-guarded file tree implementing the Fs capability.
// Purpose: Keep fixture and assertion tests off the real disk.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`MemFs`] stores files and directories in a map keyed by normalized
//! absolute paths. Clones share the same tree.
//! Invariants:
//! - The root directory `/` always exists.
//! - Every stored entry has a directory parent.
//! - Creating a file creates its missing parent directories.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::DEFAULT_DIR_PERMISSIONS;
use crate::DEFAULT_FILE_PERMISSIONS;
use crate::FileInfo;
use crate::FileMode;
use crate::Fs;
use crate::FsError;
use crate::PERMISSION_MASK;

// ============================================================================
// SECTION: Tree Model
// ============================================================================

/// Key of the root directory.
const ROOT: &str = "/";

/// Content of a stored entry.
#[derive(Debug, Clone)]
enum NodeKind {
    /// Regular file bytes.
    File(Vec<u8>),
    /// Directory marker; children are found by key prefix.
    Dir,
}

/// A stored entry.
#[derive(Debug, Clone)]
struct Node {
    /// Entry content.
    kind: NodeKind,
    /// Permission bits.
    permissions: u32,
}

/// Entries keyed by normalized absolute path.
type Tree = BTreeMap<String, Node>;

// ============================================================================
// SECTION: MemFs
// ============================================================================

/// In-memory [`Fs`] implementation.
#[derive(Debug, Clone)]
pub struct MemFs {
    /// Shared entry map.
    tree: Arc<Mutex<Tree>>,
}

impl MemFs {
    /// Creates an empty filesystem containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Tree::new();
        tree.insert(
            ROOT.to_string(),
            Node {
                kind: NodeKind::Dir,
                permissions: DEFAULT_DIR_PERMISSIONS,
            },
        );
        Self {
            tree: Arc::new(Mutex::new(tree)),
        }
    }

    /// Locks the tree, mapping poisoning to [`FsError::Poisoned`].
    fn lock(&self, op: &'static str, path: &Path) -> Result<MutexGuard<'_, Tree>, FsError> {
        self.tree.lock().map_err(|_| FsError::Poisoned {
            op,
            path: path.display().to_string(),
        })
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl Fs for MemFs {
    fn name(&self) -> &str {
        "MemFs"
    }

    fn create(&self, path: &Path) -> Result<Box<dyn Write>, FsError> {
        let key = normalize(path);
        let mut tree = self.lock("create", path)?;
        if let Some(parent) = parent_key(&key) {
            ensure_dirs(&mut tree, parent, DEFAULT_DIR_PERMISSIONS, "create", path)?;
        }
        let permissions = match tree.get(&key) {
            Some(Node {
                kind: NodeKind::Dir,
                ..
            }) => return Err(is_a_directory("create", path)),
            Some(node) => node.permissions,
            None => DEFAULT_FILE_PERMISSIONS,
        };
        tree.insert(
            key.clone(),
            Node {
                kind: NodeKind::File(Vec::new()),
                permissions,
            },
        );
        Ok(Box::new(MemFileWriter {
            tree: Arc::clone(&self.tree),
            key,
        }))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read>, FsError> {
        let key = normalize(path);
        let tree = self.lock("open", path)?;
        match tree.get(&key) {
            None => Err(not_found("open", path)),
            Some(Node {
                kind: NodeKind::Dir,
                ..
            }) => Err(is_a_directory("open", path)),
            Some(Node {
                kind: NodeKind::File(bytes),
                ..
            }) => Ok(Box::new(Cursor::new(bytes.clone()))),
        }
    }

    fn stat(&self, path: &Path) -> Result<FileInfo, FsError> {
        let key = normalize(path);
        let tree = self.lock("stat", path)?;
        let node = tree.get(&key).ok_or_else(|| not_found("stat", path))?;
        let (size, mode) = match &node.kind {
            NodeKind::File(bytes) => (bytes.len() as u64, FileMode::file(node.permissions)),
            NodeKind::Dir => (0, FileMode::dir(node.permissions)),
        };
        Ok(FileInfo {
            name: base_name(&key).to_string(),
            size,
            mode,
        })
    }

    fn mkdir_all(&self, path: &Path, permissions: u32) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.lock("mkdir", path)?;
        ensure_dirs(&mut tree, &key, permissions, "mkdir", path)
    }

    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>, FsError> {
        let key = normalize(path);
        let tree = self.lock("readdir", path)?;
        match tree.get(&key) {
            None => return Err(not_found("readdir", path)),
            Some(Node {
                kind: NodeKind::File(_),
                ..
            }) => {
                return Err(FsError::NotADirectory {
                    op: "readdir",
                    path: path.display().to_string(),
                });
            }
            Some(_) => {}
        }
        Ok(tree
            .keys()
            .filter(|candidate| parent_key(candidate) == Some(key.as_str()))
            .map(|child| base_name(child).to_string())
            .collect())
    }

    fn chmod(&self, path: &Path, permissions: u32) -> Result<(), FsError> {
        let key = normalize(path);
        let mut tree = self.lock("chmod", path)?;
        let node = tree.get_mut(&key).ok_or_else(|| not_found("chmod", path))?;
        node.permissions = permissions & PERMISSION_MASK;
        Ok(())
    }
}

// ============================================================================
// SECTION: File Writer
// ============================================================================

/// Writer appending to a stored file.
struct MemFileWriter {
    /// Shared entry map.
    tree: Arc<Mutex<Tree>>,
    /// Key of the file being written.
    key: String,
}

impl Write for MemFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut tree =
            self.tree.lock().map_err(|_| io::Error::other("filesystem lock poisoned"))?;
        match tree.get_mut(&self.key) {
            Some(Node {
                kind: NodeKind::File(bytes),
                ..
            }) => {
                bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "file removed while open")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Normalizes a path into an absolute `/`-separated key.
fn normalize(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    if parts.is_empty() {
        return ROOT.to_string();
    }
    let mut key = String::new();
    for part in parts {
        key.push('/');
        key.push_str(&part);
    }
    key
}

/// Returns the parent key, or `None` for the root.
fn parent_key(key: &str) -> Option<&str> {
    if key == ROOT {
        return None;
    }
    match key.rsplit_once('/') {
        Some(("", _)) | None => Some(ROOT),
        Some((parent, _)) => Some(parent),
    }
}

/// Returns the final component of a key.
fn base_name(key: &str) -> &str {
    if key == ROOT {
        return ROOT;
    }
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}

/// Creates `key` and its missing ancestors as directories.
fn ensure_dirs(
    tree: &mut Tree,
    key: &str,
    permissions: u32,
    op: &'static str,
    path: &Path,
) -> Result<(), FsError> {
    let mut chain = Vec::new();
    let mut current = Some(key);
    while let Some(candidate) = current {
        match tree.get(candidate) {
            Some(Node {
                kind: NodeKind::Dir,
                ..
            }) => break,
            Some(Node {
                kind: NodeKind::File(_),
                ..
            }) => {
                return Err(FsError::NotADirectory {
                    op,
                    path: path.display().to_string(),
                });
            }
            None => chain.push(candidate.to_string()),
        }
        current = parent_key(candidate);
    }
    for dir in chain.into_iter().rev() {
        tree.insert(
            dir,
            Node {
                kind: NodeKind::Dir,
                permissions: permissions & PERMISSION_MASK,
            },
        );
    }
    Ok(())
}

/// Builds a not-found error.
fn not_found(op: &'static str, path: &Path) -> FsError {
    FsError::NotFound {
        op,
        path: path.display().to_string(),
    }
}

/// Builds an is-a-directory error.
fn is_a_directory(op: &'static str, path: &Path) -> FsError {
    FsError::IsADirectory {
        op,
        path: path.display().to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
