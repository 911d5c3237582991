pub mod makefile;
pub mod toolchain;
