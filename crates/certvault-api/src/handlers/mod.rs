//! HTTP request handlers, organized by domain.

pub mod audit;
pub mod documents;
pub mod explorer;
pub mod health;
