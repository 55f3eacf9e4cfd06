//! User-facing roles and their capability table.

pub mod role;

pub use role::Role;
