// crates/testutils-vfs/src/dir.rs
// ============================================================================
// Module: Directory-Rooted Filesystem
// Description: Disk-backed Fs implementation confined to one directory.
// Purpose: Run the same helpers against real files without escaping a root.
// Dependencies: cap-std
// ============================================================================

//! ## Overview
//! [`DirFs`] resolves every path inside a `cap_std` directory handle. Absolute
//! paths are reinterpreted relative to that root, so `/certs/tls.crt` lands in
//! `<root>/certs/tls.crt`. Paths that would escape the root are rejected by
//! `cap_std` and surface as [`FsError::Io`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::Permissions;

use crate::FileInfo;
use crate::FileMode;
use crate::Fs;
use crate::FsError;

// ============================================================================
// SECTION: DirFs
// ============================================================================

/// Disk-backed [`Fs`] confined to a root directory.
#[derive(Debug)]
pub struct DirFs {
    /// Capability handle for the root directory.
    root: Dir,
    /// Ambient path of the root, kept for display.
    root_path: PathBuf,
}

impl DirFs {
    /// Opens an existing directory as the filesystem root.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the directory cannot be opened.
    pub fn open_ambient(root_path: impl Into<PathBuf>) -> Result<Self, FsError> {
        let root_path = root_path.into();
        let root = Dir::open_ambient_dir(&root_path, ambient_authority())
            .map_err(|source| FsError::from_io("open", &root_path, source))?;
        Ok(Self {
            root,
            root_path,
        })
    }

    /// Returns the ambient path of the root directory.
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Opens an entry as a standard file handle for permission access.
    fn open_std(&self, relative: &Path, is_dir: bool) -> std::io::Result<std::fs::File> {
        if relative.as_os_str().is_empty() {
            return Ok(self.root.try_clone()?.into_std_file());
        }
        if is_dir {
            return Ok(self.root.open_dir(relative)?.into_std_file());
        }
        Ok(self.root.open(relative)?.into_std())
    }

    /// Returns the permission bits of an entry.
    fn permissions_of(&self, relative: &Path, is_dir: bool) -> std::io::Result<u32> {
        let file = self.open_std(relative, is_dir)?;
        Ok(permission_bits(&file.metadata()?.permissions()))
    }

    /// Replaces the permission bits of an entry.
    fn set_permissions_of(
        &self,
        relative: &Path,
        is_dir: bool,
        permissions: u32,
    ) -> std::io::Result<()> {
        let mut current = self.open_std(relative, is_dir)?.metadata()?.permissions();
        apply_permission_bits(&mut current, permissions);
        let target = if relative.as_os_str().is_empty() { Path::new(".") } else { relative };
        self.root.set_permissions(target, Permissions::from_std(current))
    }

    /// Returns true when the entry exists and is a directory.
    fn is_dir(&self, relative: &Path) -> std::io::Result<bool> {
        if relative.as_os_str().is_empty() {
            return Ok(true);
        }
        Ok(self.root.metadata(relative)?.is_dir())
    }
}

impl Fs for DirFs {
    fn name(&self) -> &str {
        "DirFs"
    }

    fn create(&self, path: &Path) -> Result<Box<dyn Write>, FsError> {
        let relative = relative_path(path);
        if relative.as_os_str().is_empty() {
            return Err(FsError::IsADirectory {
                op: "create",
                path: path.display().to_string(),
            });
        }
        let file =
            self.root.create(&relative).map_err(|source| FsError::from_io("create", path, source))?;
        Ok(Box::new(file))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read>, FsError> {
        let relative = relative_path(path);
        if self.is_dir(&relative).map_err(|source| FsError::from_io("open", path, source))? {
            return Err(FsError::IsADirectory {
                op: "open",
                path: path.display().to_string(),
            });
        }
        let file =
            self.root.open(&relative).map_err(|source| FsError::from_io("open", path, source))?;
        Ok(Box::new(file))
    }

    fn stat(&self, path: &Path) -> Result<FileInfo, FsError> {
        let relative = relative_path(path);
        let map_err = |source| FsError::from_io("stat", path, source);
        let (is_dir, size) = if relative.as_os_str().is_empty() {
            (true, 0)
        } else {
            let metadata = self.root.metadata(&relative).map_err(map_err)?;
            (metadata.is_dir(), if metadata.is_dir() { 0 } else { metadata.len() })
        };
        let permissions = self.permissions_of(&relative, is_dir).map_err(map_err)?;
        let name = relative
            .file_name()
            .map_or_else(|| "/".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(FileInfo {
            name,
            size,
            mode: if is_dir { FileMode::dir(permissions) } else { FileMode::file(permissions) },
        })
    }

    fn mkdir_all(&self, path: &Path, permissions: u32) -> Result<(), FsError> {
        let relative = relative_path(path);
        if relative.as_os_str().is_empty() {
            return Ok(());
        }
        let map_err = |source| FsError::from_io("mkdir", path, source);
        if self.root.exists(&relative) {
            if self.is_dir(&relative).map_err(map_err)? {
                return Ok(());
            }
            return Err(FsError::NotADirectory {
                op: "mkdir",
                path: path.display().to_string(),
            });
        }
        self.root.create_dir_all(&relative).map_err(map_err)?;
        self.set_permissions_of(&relative, true, permissions).map_err(map_err)?;
        tracing::trace!(root = %self.root_path.display(), path = %path.display(), "created directory");
        Ok(())
    }

    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>, FsError> {
        let relative = relative_path(path);
        let map_err = |source| FsError::from_io("readdir", path, source);
        if !self.is_dir(&relative).map_err(map_err)? {
            return Err(FsError::NotADirectory {
                op: "readdir",
                path: path.display().to_string(),
            });
        }
        let entries = if relative.as_os_str().is_empty() {
            self.root.entries().map_err(map_err)?
        } else {
            self.root.read_dir(&relative).map_err(map_err)?
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(map_err)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn chmod(&self, path: &Path, permissions: u32) -> Result<(), FsError> {
        let relative = relative_path(path);
        let map_err = |source| FsError::from_io("chmod", path, source);
        let is_dir = self.is_dir(&relative).map_err(map_err)?;
        self.set_permissions_of(&relative, is_dir, permissions).map_err(map_err)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Strips root and prefix components so the path resolves under the root.
fn relative_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::Prefix(_) | Component::RootDir))
        .collect()
}

/// Extracts permission bits from standard permissions.
#[cfg(unix)]
fn permission_bits(permissions: &std::fs::Permissions) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    permissions.mode() & crate::PERMISSION_MASK
}

/// Extracts permission bits from standard permissions.
#[cfg(not(unix))]
fn permission_bits(permissions: &std::fs::Permissions) -> u32 {
    if permissions.readonly() { 0o444 } else { 0o666 }
}

/// Writes permission bits into standard permissions.
#[cfg(unix)]
fn apply_permission_bits(permissions: &mut std::fs::Permissions, bits: u32) {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(bits & crate::PERMISSION_MASK);
}

/// Writes permission bits into standard permissions.
#[cfg(not(unix))]
fn apply_permission_bits(permissions: &mut std::fs::Permissions, bits: u32) {
    permissions.set_readonly(bits & 0o222 == 0);
}
