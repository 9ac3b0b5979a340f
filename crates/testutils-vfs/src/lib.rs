// crates/testutils-vfs/src/lib.rs
// ============================================================================
// Module: Testutils Virtual Filesystem
// Description: Filesystem capability consumed by the toolkit helpers.
// Purpose: Let tests run fixture and assertion helpers against memory or disk.
// Dependencies: cap-std, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate defines the [`Fs`] capability: the small set of filesystem
//! operations (create, open, stat, make directories, list names, chmod) that
//! the toolkit assertion and fixture helpers need. Two implementations ship
//! with it:
//! - [`MemFs`], an in-memory tree shared between clones.
//! - [`DirFs`], a disk-backed filesystem confined to a `cap_std` directory.
//!
//! Invariants:
//! - Errors name the failing operation and the path exactly as the caller
//!   supplied it (`open /hello/world: file does not exist`).
//! - [`FileInfo`] never carries timestamps; equivalence checks rely on mode
//!   and size only.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dir;
pub mod memory;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dir::DirFs;
pub use memory::MemFs;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Permission bits applied to regular files created through [`Fs::create`].
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o644;
/// Permission bits applied to implicitly created parent directories.
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o755;
/// Mask selecting the permission, setuid, setgid and sticky bits.
pub const PERMISSION_MASK: u32 = 0o7777;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by [`Fs`] implementations.
///
/// # Invariants
/// - `op` is the short operation name (`open`, `create`, `stat`, `mkdir`,
///   `readdir`, `chmod`).
/// - `path` is the caller-supplied path, rendered for display.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path does not exist.
    #[error("{op} {path}: file does not exist")]
    NotFound {
        /// Operation that failed.
        op: &'static str,
        /// Path the operation targeted.
        path: String,
    },
    /// A path component that must be a directory is a regular file.
    #[error("{op} {path}: not a directory")]
    NotADirectory {
        /// Operation that failed.
        op: &'static str,
        /// Path the operation targeted.
        path: String,
    },
    /// A regular file was expected but the path is a directory.
    #[error("{op} {path}: is a directory")]
    IsADirectory {
        /// Operation that failed.
        op: &'static str,
        /// Path the operation targeted.
        path: String,
    },
    /// The in-memory tree lock was poisoned by a panicking writer.
    #[error("{op} {path}: filesystem lock poisoned")]
    Poisoned {
        /// Operation that failed.
        op: &'static str,
        /// Path the operation targeted.
        path: String,
    },
    /// Any other I/O failure from the backing store.
    #[error("{op} {path}: {source}")]
    Io {
        /// Operation that failed.
        op: &'static str,
        /// Path the operation targeted.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl FsError {
    /// Returns true when the error means the path does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound {
                ..
            } => true,
            Self::Io {
                source, ..
            } => source.kind() == io::ErrorKind::NotFound,
            Self::NotADirectory {
                ..
            }
            | Self::IsADirectory {
                ..
            }
            | Self::Poisoned {
                ..
            } => false,
        }
    }

    /// Wraps an I/O error, classifying not-found errors.
    pub(crate) fn from_io(op: &'static str, path: &Path, source: io::Error) -> Self {
        let path = path.display().to_string();
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound {
                op,
                path,
            };
        }
        Self::Io {
            op,
            path,
            source,
        }
    }
}

// ============================================================================
// SECTION: File Metadata
// ============================================================================

/// File type and permission bits of a filesystem entry.
///
/// # Invariants
/// - `permissions` never carries bits outside [`PERMISSION_MASK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode {
    /// Whether the entry is a directory.
    is_dir: bool,
    /// Permission bits.
    permissions: u32,
}

impl FileMode {
    /// Creates a mode for a regular file.
    #[must_use]
    pub const fn file(permissions: u32) -> Self {
        Self {
            is_dir: false,
            permissions: permissions & PERMISSION_MASK,
        }
    }

    /// Creates a mode for a directory.
    #[must_use]
    pub const fn dir(permissions: u32) -> Self {
        Self {
            is_dir: true,
            permissions: permissions & PERMISSION_MASK,
        }
    }

    /// Returns true for directories.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        self.is_dir
    }

    /// Returns the permission bits.
    #[must_use]
    pub const fn permissions(self) -> u32 {
        self.permissions
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const FLAGS: [char; 9] = ['r', 'w', 'x', 'r', 'w', 'x', 'r', 'w', 'x'];
        let mut rendered = String::with_capacity(10);
        rendered.push(if self.is_dir { 'd' } else { '-' });
        for (index, flag) in FLAGS.iter().enumerate() {
            let bit = 1 << (8 - index);
            rendered.push(if self.permissions & bit == 0 { '-' } else { *flag });
        }
        f.write_str(&rendered)
    }
}

/// Result of [`Fs::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Final path component (`/` for the root).
    pub name: String,
    /// Size in bytes; directories report zero.
    pub size: u64,
    /// Entry type and permissions.
    pub mode: FileMode,
}

impl FileInfo {
    /// Returns true for directories.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }
}

// ============================================================================
// SECTION: Filesystem Capability
// ============================================================================

/// Filesystem operations used by the toolkit helpers.
///
/// Implementations take `&self`; any mutable state lives behind interior
/// mutability so one handle can be passed to several helpers at once.
pub trait Fs {
    /// Display name used in failure messages.
    fn name(&self) -> &str;

    /// Creates or truncates a regular file and returns a writer for it.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the file cannot be created.
    fn create(&self, path: &Path) -> Result<Box<dyn Write>, FsError>;

    /// Opens a regular file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the file is missing, is a directory, or
    /// cannot be opened.
    fn open(&self, path: &Path) -> Result<Box<dyn Read>, FsError>;

    /// Returns metadata for a path.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the path cannot be inspected.
    fn stat(&self, path: &Path) -> Result<FileInfo, FsError>;

    /// Creates a directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when a component is a regular file or creation
    /// fails.
    fn mkdir_all(&self, path: &Path, permissions: u32) -> Result<(), FsError>;

    /// Lists the entry names of a directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the path is missing or not a directory.
    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>, FsError>;

    /// Replaces the permission bits of a path.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the path is missing or cannot be updated.
    fn chmod(&self, path: &Path, permissions: u32) -> Result<(), FsError>;
}

/// Reads a whole file through the [`Fs`] capability.
///
/// # Errors
///
/// Returns [`FsError`] when the file cannot be opened or read.
pub fn read_file(fs: &dyn Fs, path: &Path) -> Result<Vec<u8>, FsError> {
    let mut reader = fs.open(path)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|source| FsError::from_io("read", path, source))?;
    Ok(bytes)
}

/// Creates or truncates a file and writes `contents` to it.
///
/// # Errors
///
/// Returns [`FsError`] when the file cannot be created or written.
pub fn write_file(fs: &dyn Fs, path: &Path, contents: &[u8]) -> Result<(), FsError> {
    let mut writer = fs.create(path)?;
    writer.write_all(contents).map_err(|source| FsError::from_io("write", path, source))?;
    writer.flush().map_err(|source| FsError::from_io("write", path, source))?;
    tracing::trace!(fs = fs.name(), path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests;
