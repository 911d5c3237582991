//! In-memory [`FileSystem`] for discovery tests.
//!
//! Models regular files (with an execute bit), directories and symlinks.
//! Paths are absolute; relative paths are taken relative to `/`. Symlinks in
//! intermediate components are always followed, the final component only by
//! `stat`.
//!
//! `MemoryFileSystem` is `Clone`; clones share the same tree, so a test can
//! hand one clone to the code under test and keep another to inspect or
//! mutate the tree.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::io::{FileKind, FileStat, FileSystem};

const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
enum Node {
    File { contents: String, executable: bool },
    Dir,
    Symlink(PathBuf),
}

type Nodes = BTreeMap<PathBuf, Node>;

#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    nodes: Arc<RwLock<Nodes>>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// Create a file system containing only `/`.
    pub fn new() -> Self {
        let mut nodes = Nodes::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    /// Add a directory (and its parents).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path.as_ref())
            .expect("failed to create directory in memory fs");
        self
    }

    /// Add a non-executable file (and its parent directories).
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.write_file(path.as_ref(), contents, false)
            .expect("failed to create file in memory fs");
        self
    }

    /// Add an executable file (and its parent directories).
    pub fn with_executable(self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.write_file(path.as_ref(), contents, true)
            .expect("failed to create executable in memory fs");
        self
    }

    /// Add a symlink at `link` pointing to `original` (creating `link`'s parents).
    pub fn with_symlink(self, original: impl AsRef<Path>, link: impl AsRef<Path>) -> Self {
        let link = normalize(link.as_ref());
        if let Some(parent) = link.parent() {
            self.create_dir_all(parent)
                .expect("failed to create symlink parent in memory fs");
        }
        self.symlink(original.as_ref(), &link)
            .expect("failed to create symlink in memory fs");
        self
    }

    /// Create or overwrite a file, creating its parent directories.
    pub fn write_file(&self, path: &Path, contents: &str, executable: bool) -> io::Result<()> {
        let path = normalize(path);
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        let mut nodes = self.write();
        let key = resolve_parent(&nodes, &path)?;
        if let Some(Node::Dir) = nodes.get(&key) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{} is a directory", key.display()),
            ));
        }
        nodes.insert(
            key,
            Node::File {
                contents: contents.to_string(),
                executable,
            },
        );
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Nodes> {
        self.nodes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Nodes> {
        self.nodes.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::Normal(name) => out.push(name),
            Component::ParentDir => {
                out.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    out
}

fn parts(path: &Path) -> Vec<OsString> {
    normalize(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_os_string()),
            _ => None,
        })
        .collect()
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

fn not_a_dir(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotADirectory,
        format!("{}: not a directory", path.display()),
    )
}

fn resolve(nodes: &Nodes, path: &Path, follow_last: bool) -> io::Result<PathBuf> {
    let mut hops = 0;
    resolve_with_hops(nodes, path, follow_last, &mut hops)
}

fn resolve_with_hops(
    nodes: &Nodes,
    path: &Path,
    follow_last: bool,
    hops: &mut usize,
) -> io::Result<PathBuf> {
    let parts = parts(path);
    let mut cur = PathBuf::from("/");

    for (i, part) in parts.iter().enumerate() {
        let last = i + 1 == parts.len();
        cur.push(part);
        match nodes.get(&cur) {
            Some(Node::Symlink(target)) if !last || follow_last => {
                *hops += 1;
                if *hops > MAX_SYMLINK_HOPS {
                    return Err(io::Error::other(format!(
                        "{}: too many levels of symbolic links",
                        path.display()
                    )));
                }
                let target = if target.is_absolute() {
                    target.clone()
                } else {
                    cur.parent().unwrap_or_else(|| Path::new("/")).join(target)
                };
                cur = resolve_with_hops(nodes, &target, true, hops)?;
            }
            Some(Node::File { .. }) if !last => return Err(not_a_dir(&cur)),
            None if !last => return Err(not_found(&cur)),
            _ => {}
        }
    }
    Ok(cur)
}

/// Resolve everything but the final component, which is kept as-is.
fn resolve_parent(nodes: &Nodes, path: &Path) -> io::Result<PathBuf> {
    let path = normalize(path);
    let Some(name) = path.file_name() else {
        return Ok(path);
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    let parent = resolve(nodes, parent, true)?;
    match nodes.get(&parent) {
        Some(Node::Dir) => Ok(parent.join(name)),
        Some(_) => Err(not_a_dir(&parent)),
        None => Err(not_found(&parent)),
    }
}

fn stat_node(node: Option<&Node>, path: &Path) -> io::Result<FileStat> {
    match node {
        Some(Node::File { executable, .. }) => Ok(FileStat {
            kind: FileKind::File,
            executable: *executable,
        }),
        Some(Node::Dir) => Ok(FileStat {
            kind: FileKind::Dir,
            executable: true,
        }),
        Some(Node::Symlink(_)) => Ok(FileStat {
            kind: FileKind::Symlink,
            executable: true,
        }),
        None => Err(not_found(path)),
    }
}

impl FileSystem for MemoryFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let nodes = self.read();
        let resolved = resolve(&nodes, path, true)?;
        stat_node(nodes.get(&resolved), path)
    }

    fn lstat(&self, path: &Path) -> io::Result<FileStat> {
        let nodes = self.read();
        let resolved = resolve(&nodes, path, false)?;
        stat_node(nodes.get(&resolved), path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let nodes = self.read();
        let dir = resolve(&nodes, path, true)?;
        match nodes.get(&dir) {
            Some(Node::Dir) => {}
            Some(_) => return Err(not_a_dir(path)),
            None => return Err(not_found(path)),
        }
        let mut names: Vec<String> = nodes
            .keys()
            .filter(|key| key.parent() == Some(dir.as_path()))
            .filter_map(|key| key.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let nodes = self.read();
        let resolved = resolve(&nodes, path, true)?;
        match nodes.get(&resolved) {
            Some(Node::File { contents, .. }) => Ok(contents.clone()),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{}: is a directory", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.write();
        let mut cur = PathBuf::from("/");
        for part in parts(path) {
            cur.push(&part);
            match nodes.get(&cur) {
                Some(Node::Dir) => {}
                Some(Node::Symlink(_)) => {
                    let target = resolve(&nodes, &cur, true)?;
                    match nodes.get(&target) {
                        Some(Node::Dir) => cur = target,
                        Some(_) => return Err(not_a_dir(&cur)),
                        None => return Err(not_found(&target)),
                    }
                }
                Some(Node::File { .. }) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{}: file exists", cur.display()),
                    ))
                }
                None => {
                    nodes.insert(cur.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()> {
        let mut nodes = self.write();
        let key = resolve_parent(&nodes, link)?;
        if nodes.contains_key(&key) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{}: file exists", key.display()),
            ));
        }
        nodes.insert(key, Node::Symlink(original.to_path_buf()));
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.write();
        let key = match resolve_parent(&nodes, path) {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if key == Path::new("/") {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "refusing to remove /",
            ));
        }
        nodes.retain(|k, _| !k.starts_with(&key));
        Ok(())
    }
}
