//! Object storage backends

pub mod fs;

pub use fs::FsObjectStore;
