pub mod real;
pub mod traits;

// Re-export I/O traits for convenient access
pub use real::RealFileSystem;
pub use traits::{optional, FileKind, FileStat, FileSystem};
