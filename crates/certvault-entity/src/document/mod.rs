//! Document node entities: files and folders share one table, with a
//! sentinel storage path marking folder rows.

pub mod kind;
pub mod metadata;
pub mod model;
pub mod query;
pub mod status;

pub use kind::DocumentKind;
pub use metadata::{
    CertificateMetadata, ChemicalComposition, MechanicalProperties, SteelBatchMetadata,
};
pub use model::{DocumentNode, NewDocument, FOLDER_STORAGE_PATH};
pub use query::ListQuery;
pub use status::InspectionStatus;
