//! Filesystem capability used by toolchain discovery and installation.
//!
//! Discovery is driven entirely by what the filesystem contains, so it is
//! written against this trait rather than `std::fs`. Production code uses
//! [`RealFileSystem`](crate::io::RealFileSystem); tests substitute
//! [`MemoryFileSystem`](crate::testkit::MemoryFileSystem).
//!
//! Errors are plain [`std::io::Error`]s so callers can test for
//! [`std::io::ErrorKind::NotFound`] and propagate everything else unchanged.

use std::io;
use std::path::Path;

/// What a directory entry is, as seen by `stat` or `lstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
    Symlink,
}

/// The subset of file metadata discovery cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: FileKind,
    /// Any of the owner/group/other execute bits is set
    pub executable: bool,
}

impl FileStat {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// File system operations trait.
///
/// Implementations should be thread-safe (`Send + Sync`).
pub trait FileSystem: Send + Sync {
    /// Metadata of `path`, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Metadata of `path` itself; a symlink reports [`FileKind::Symlink`].
    fn lstat(&self, path: &Path) -> io::Result<FileStat>;

    /// Names of the entries in a directory, sorted lexically.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Read a file's contents as a UTF-8 string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing to `original`.
    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()>;

    /// Remove whatever is at `path`, recursively. A missing path is not an error.
    fn remove_all(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists, following symlinks.
    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_ok()
    }
}

/// Map a `NotFound` error to `None`, keep every other outcome.
pub fn optional<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
