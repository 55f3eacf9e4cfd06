//! # certvault-storage
//!
//! Object storage providers for CertVault (local filesystem by default,
//! S3-compatible stores behind the `s3` feature) plus object path
//! composition and filename sanitization.

pub mod path;
pub mod providers;

pub use providers::from_config;
