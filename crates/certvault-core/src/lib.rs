//! # certvault-core
//!
//! Core crate for CertVault. Contains configuration schemas, the unified
//! error system, pagination types, and the trait seam for object storage.
//!
//! This crate has **no** internal dependencies on other CertVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
