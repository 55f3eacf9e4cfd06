//! Core traits defined in `certvault-core` and implemented by other crates.

pub mod storage;

pub use storage::ObjectStore;
