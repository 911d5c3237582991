//! Finding toolchains in the search path.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::{Error, Result};
use crate::io::{optional, FileKind};
use crate::toolchain::info::ToolchainInfo;
use crate::toolchain::manifest::MANIFEST_FILENAME;
use crate::toolchain::registry::{normalize_toolchain_path, Toolchains};
use crate::utils::paths;

/// A directory to walk, and the search path root its toolchains are named from.
///
/// Symlinked directories are walked as roots of their own but keep the
/// originating root as `base`, so their toolchains are reported by the path
/// through the symlink rather than by the symlink's target.
#[derive(Debug, Clone)]
struct WalkRoot {
    dir: PathBuf,
    base: PathBuf,
}

fn is_private(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            name.starts_with('.') || name.starts_with('_')
        })
        .unwrap_or(false)
}

impl Toolchains {
    /// Find the toolchain at `path` (relative to each search path entry).
    ///
    /// Returns [`Error::ToolchainNotFound`] when no entry has
    /// `<dir>/<path>/Srclibtoolchain`, and [`Error::ToolchainShadowed`] when
    /// more than one does. A leading `/` on `path` is ignored; a path that
    /// climbs out of the entry is [`Error::InvalidToolchainPath`].
    pub fn lookup(&self, path: &str) -> Result<ToolchainInfo> {
        let path = normalize_toolchain_path(path)?;

        let mut matches = BTreeSet::new();
        for dir in self.search_path.dirs() {
            let candidate = dir.join(&path).join(MANIFEST_FILENAME);
            if optional(self.fs.stat(&candidate))?.is_some() {
                matches.insert(candidate);
            }
        }

        let mut matches: Vec<PathBuf> = matches.into_iter().collect();
        match matches.len() {
            0 => Err(Error::ToolchainNotFound { path }),
            1 => {
                let manifest = matches.remove(0);
                let dir = manifest.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
                ToolchainInfo::inspect(self.fs.as_ref(), &path, &dir, MANIFEST_FILENAME)
            }
            _ => Err(Error::ToolchainShadowed { path, matches }),
        }
    }

    /// Find every toolchain in the search path.
    ///
    /// Hidden entries (`.` or `_` prefixed) are skipped, symlinked directories
    /// are followed, and a toolchain directory is never searched for nested
    /// toolchains. A root listed twice is walked once; otherwise reaching the
    /// same toolchain path twice is an error.
    pub fn list(&self) -> Result<Vec<ToolchainInfo>> {
        let mut found = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        let mut listed = HashSet::new();
        let mut roots: VecDeque<WalkRoot> = self
            .search_path
            .dirs()
            .iter()
            .filter(|dir| listed.insert(dir.as_path()))
            .map(|dir| WalkRoot {
                dir: dir.clone(),
                base: dir.clone(),
            })
            .collect();

        while let Some(root) = roots.pop_front() {
            if optional(self.fs.stat(&root.dir))?.is_none() {
                debug!(dir = %root.dir.display(), "search path entry does not exist, skipping");
                continue;
            }

            let mut pending = vec![root.dir.clone()];
            while let Some(path) = pending.pop() {
                let is_root = path == root.dir;
                if !is_root && is_private(&path) {
                    continue;
                }

                // Roots may themselves be symlinks (that is how followed links are walked).
                let stat = if is_root {
                    self.fs.stat(&path)?
                } else {
                    self.fs.lstat(&path)?
                };

                match stat.kind {
                    FileKind::File => {}
                    FileKind::Symlink => match optional(self.fs.stat(&path))? {
                        Some(target) if target.is_dir() => {
                            trace!(link = %path.display(), "following symlinked directory");
                            roots.push_back(WalkRoot {
                                dir: path,
                                base: root.base.clone(),
                            });
                        }
                        _ => {}
                    },
                    FileKind::Dir => {
                        let manifest = path.join(MANIFEST_FILENAME);
                        if optional(self.fs.stat(&manifest))?.is_some() {
                            let info = self.found_toolchain(&root, &path, &mut seen)?;
                            found.push(info);
                            continue;
                        }

                        let names = self.fs.read_dir(&path)?;
                        pending.extend(names.iter().rev().map(|name| path.join(name)));
                    }
                }
            }
        }

        Ok(found)
    }

    fn found_toolchain(
        &self,
        root: &WalkRoot,
        dir: &Path,
        seen: &mut HashMap<String, PathBuf>,
    ) -> Result<ToolchainInfo> {
        let toolchain_path =
            paths::relative_to(dir, &root.base).unwrap_or_else(|| dir.display().to_string());

        if let Some(other) = seen.get(&toolchain_path) {
            return Err(Error::ToolchainCollision {
                path: toolchain_path,
                first: other.clone(),
                second: dir.to_path_buf(),
            });
        }
        seen.insert(toolchain_path.clone(), dir.to_path_buf());

        let info = ToolchainInfo::inspect(self.fs.as_ref(), &toolchain_path, dir, MANIFEST_FILENAME)?;
        debug!(
            toolchain = %info.path,
            dir = %info.dir.display(),
            program = info.has_program(),
            docker = info.has_dockerfile(),
            "found toolchain"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchPath;
    use crate::testkit::MemoryFileSystem;

    fn registry(fs: &MemoryFileSystem, dirs: &[&str]) -> Toolchains {
        Toolchains::new(SearchPath::from_dirs(dirs.iter().copied())).with_fs(fs.clone())
    }

    fn invocable_paths(toolchains: &[ToolchainInfo]) -> Vec<&str> {
        toolchains
            .iter()
            .filter(|t| t.is_invocable())
            .map(|t| t.path.as_str())
            .collect()
    }

    #[test]
    fn test_list_program() {
        let fs = MemoryFileSystem::new()
            // ok
            .with_executable("/sp/a/a/.bin/a", "")
            .with_executable("/sp/a/a/Srclibtoolchain", "")
            // not executable, and not named after the toolchain
            .with_file("/sp/b/b/.bin/z", "")
            .with_file("/sp/b/b/Srclibtoolchain", "")
            // not in .bin
            .with_executable("/sp/c/c/c", "")
            .with_executable("/sp/c/c/Srclibtoolchain", "")
            // a file symlink in the search path
            .with_symlink("/sp/a/a/.bin/a", "/sp/link");

        let toolchains = registry(&fs, &["/sp"]).list().unwrap();
        assert_eq!(invocable_paths(&toolchains), vec!["a/a"]);
        assert_eq!(toolchains.len(), 3);
    }

    #[test]
    fn test_list_docker() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp/a/a/Dockerfile", "")
            .with_file("/sp/a/a/Srclibtoolchain", "")
            .with_file("/sp/b/b/Dockerfile", "")
            .with_file("/sp/c/c/Srclibtoolchain", "");

        let toolchains = registry(&fs, &["/sp"]).list().unwrap();
        assert_eq!(invocable_paths(&toolchains), vec!["a/a"]);

        let all: Vec<&str> = toolchains.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(all, vec!["a/a", "c/c"]);
        assert!(!toolchains[1].has_dockerfile());
        assert!(!toolchains[1].has_program());
    }

    #[test]
    fn test_list_skips_hidden_and_private_dirs() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp/.tmp/x/Srclibtoolchain", "")
            .with_file("/sp/_old/y/Srclibtoolchain", "")
            .with_file("/sp/z/Srclibtoolchain", "");

        let toolchains = registry(&fs, &["/sp"]).list().unwrap();
        let paths: Vec<&str> = toolchains.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["z"]);
    }

    #[test]
    fn test_list_hidden_root_is_still_walked() {
        let fs = MemoryFileSystem::new().with_file("/home/.srclib/tc/Srclibtoolchain", "");
        let toolchains = registry(&fs, &["/home/.srclib"]).list().unwrap();
        assert_eq!(toolchains[0].path, "tc");
    }

    #[test]
    fn test_list_does_not_descend_into_toolchains() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp/outer/Srclibtoolchain", "")
            .with_file("/sp/outer/inner/Srclibtoolchain", "");

        let toolchains = registry(&fs, &["/sp"]).list().unwrap();
        assert_eq!(toolchains.len(), 1);
        assert_eq!(toolchains[0].path, "outer");
    }

    #[test]
    fn test_list_follows_symlinks_relative_to_origin_root() {
        let fs = MemoryFileSystem::new()
            .with_executable("/work/checkout/.bin/checkout", "")
            .with_file("/work/checkout/Srclibtoolchain", "")
            .with_symlink("/work/checkout", "/sp/example.com/tc");

        let toolchains = registry(&fs, &["/sp"]).list().unwrap();
        assert_eq!(toolchains.len(), 1);
        assert_eq!(toolchains[0].path, "example.com/tc");
        assert_eq!(toolchains[0].dir, PathBuf::from("/sp/example.com/tc"));
        // The program is named after the toolchain path, not the link target.
        assert!(!toolchains[0].has_program());
    }

    #[test]
    fn test_list_follows_symlinked_parent_directories() {
        let fs = MemoryFileSystem::new()
            .with_file("/elsewhere/one/Srclibtoolchain", "")
            .with_file("/elsewhere/two/Srclibtoolchain", "")
            .with_symlink("/elsewhere", "/sp/vendor");

        let toolchains = registry(&fs, &["/sp"]).list().unwrap();
        let paths: Vec<&str> = toolchains.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["vendor/one", "vendor/two"]);
    }

    #[test]
    fn test_list_ignores_dangling_symlinks() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp/tc/Srclibtoolchain", "")
            .with_symlink("/gone", "/sp/broken");
        assert_eq!(registry(&fs, &["/sp"]).list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_collision_across_roots() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp1/tc/Srclibtoolchain", "")
            .with_file("/sp2/tc/Srclibtoolchain", "");

        let err = registry(&fs, &["/sp1", "/sp2"]).list().unwrap_err();
        match err {
            Error::ToolchainCollision { path, first, second } => {
                assert_eq!(path, "tc");
                assert_eq!(first, PathBuf::from("/sp1/tc"));
                assert_eq!(second, PathBuf::from("/sp2/tc"));
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_list_walks_repeated_root_once() {
        let fs = MemoryFileSystem::new().with_file("/sp/tc/Srclibtoolchain", "");
        let toolchains = registry(&fs, &["/sp", "/sp"]).list().unwrap();
        assert_eq!(toolchains.len(), 1);
    }

    #[test]
    fn test_list_skips_missing_roots() {
        let fs = MemoryFileSystem::new().with_file("/sp/tc/Srclibtoolchain", "");
        let toolchains = registry(&fs, &["/missing", "/sp"]).list().unwrap();
        assert_eq!(toolchains.len(), 1);
    }

    #[test]
    fn test_list_non_executable_program_fails() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp/tc/Srclibtoolchain", "")
            .with_file("/sp/tc/.bin/tc", "");
        let err = registry(&fs, &["/sp"]).list().unwrap_err();
        assert!(matches!(err, Error::ToolchainNotExecutable { .. }));
    }

    #[test]
    fn test_list_is_idempotent() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp/a/Srclibtoolchain", "")
            .with_file("/sp/b/Dockerfile", "")
            .with_file("/sp/b/Srclibtoolchain", "");
        let toolchains = registry(&fs, &["/sp"]);
        assert_eq!(toolchains.list().unwrap(), toolchains.list().unwrap());
    }

    #[test]
    fn test_lookup_found() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp2/example.com/tc/Srclibtoolchain", "")
            .with_executable("/sp2/example.com/tc/.bin/tc", "");

        let info = registry(&fs, &["/sp1", "/sp2"])
            .lookup("example.com/tc/")
            .unwrap();
        assert_eq!(info.path, "example.com/tc");
        assert_eq!(info.dir, PathBuf::from("/sp2/example.com/tc"));
        assert_eq!(info.program.as_deref(), Some(".bin/tc"));
    }

    #[test]
    fn test_lookup_not_found_is_sentinel() {
        let fs = MemoryFileSystem::new().with_dir("/sp");
        let err = registry(&fs, &["/sp"]).lookup("nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_lookup_absolute_path_stays_inside_search_path() {
        let fs = MemoryFileSystem::new()
            .with_dir("/sp")
            .with_file("/outside/tc/Srclibtoolchain", "");
        let toolchains = registry(&fs, &["/sp"]);
        assert!(toolchains.lookup("/outside/tc").unwrap_err().is_not_found());

        let fs = fs.with_file("/sp/outside/tc/Srclibtoolchain", "");
        let info = registry(&fs, &["/sp"]).lookup("/outside/tc").unwrap();
        assert_eq!(info.path, "outside/tc");
        assert_eq!(info.dir, PathBuf::from("/sp/outside/tc"));
    }

    #[test]
    fn test_lookup_rejects_paths_climbing_out_of_root() {
        let fs = MemoryFileSystem::new()
            .with_dir("/sp/a")
            .with_file("/tc/Srclibtoolchain", "");
        let toolchains = registry(&fs, &["/sp/a"]);
        for path in ["../../tc", "..", "/", "."] {
            let err = toolchains.lookup(path).unwrap_err();
            assert!(
                matches!(err, Error::InvalidToolchainPath { .. }),
                "{:?} gave {:?}",
                path,
                err
            );
        }
    }

    #[test]
    fn test_lookup_shadowed() {
        let fs = MemoryFileSystem::new()
            .with_file("/sp1/tc/Srclibtoolchain", "")
            .with_file("/sp2/tc/Srclibtoolchain", "");

        match registry(&fs, &["/sp1", "/sp2"]).lookup("tc") {
            Err(Error::ToolchainShadowed { path, matches }) => {
                assert_eq!(path, "tc");
                assert_eq!(
                    matches,
                    vec![
                        PathBuf::from("/sp1/tc/Srclibtoolchain"),
                        PathBuf::from("/sp2/tc/Srclibtoolchain")
                    ]
                );
            }
            other => panic!("expected shadow error, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_same_root_twice_is_not_shadowing() {
        let fs = MemoryFileSystem::new().with_file("/sp/tc/Srclibtoolchain", "");
        assert!(registry(&fs, &["/sp", "/sp"]).lookup("tc").is_ok());
    }
}
