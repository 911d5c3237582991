pub mod paths;

pub use paths::{clean, escapes_root, join, relative_to};
