//! Testing infrastructure: in-memory stand-ins for the filesystem, version
//! control and tool selection.
//!
//! Discovery and planning tests run against these instead of temp
//! directories and a real `git`, so each test builds exactly the tree it
//! needs and nothing leaks between tests.
//!
//! # Quick Start
//!
//! ```rust
//! use srclib::config::SearchPath;
//! use srclib::testkit::MemoryFileSystem;
//! use srclib::toolchain::Toolchains;
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file("/srclib/example.com/go/Srclibtoolchain", "")
//!     .with_executable("/srclib/example.com/go/.bin/go", "");
//!
//! let toolchains = Toolchains::new(SearchPath::from_dirs(["/srclib"])).with_fs(fs);
//! let info = toolchains.lookup("example.com/go").unwrap();
//! assert!(info.has_program());
//! ```

pub mod memory_fs;
pub mod recording_vcs;
pub mod static_chooser;

pub use memory_fs::MemoryFileSystem;
pub use recording_vcs::{RecordingVcs, VcsCall};
pub use static_chooser::StaticToolChooser;
