//! Document mutations: upload, folder creation, rename, review status,
//! deletion, plus the bounded-admin-call helper.

pub mod service;
pub mod timeout;

pub use service::{CreateFolderRequest, DocumentService, UploadRequest};
pub use timeout::with_admin_timeout;
