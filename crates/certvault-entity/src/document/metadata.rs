//! Certificate metadata: a tagged variant resolved by a `kind`
//! discriminator, normalized on read from the permissive JSON bag the
//! backend stores.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::InspectionStatus;

/// Metadata attached to a document node.
///
/// Stored as JSONB. Rows written by older clients are duck-typed bags;
/// [`CertificateMetadata::normalize`] resolves those into a variant and
/// guarantees every sub-field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CertificateMetadata {
    /// Mill test certificate for a steel batch.
    SteelBatch(SteelBatchMetadata),
    /// Marker for folders grouping inspection evidence.
    EvidenceFolder {
        /// Review status of the evidence set.
        #[serde(default)]
        status: InspectionStatus,
    },
    /// Anything else; keeps unrecognized fields intact.
    Generic {
        /// Review status.
        #[serde(default)]
        status: InspectionStatus,
        /// Unrecognized fields, carried through untouched.
        #[serde(default, flatten)]
        extra: serde_json::Map<String, Value>,
    },
}

/// Chemical composition of a steel batch, in percent by weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemicalComposition {
    pub carbon: f64,
    pub manganese: f64,
    pub silicon: f64,
    pub phosphorus: f64,
    pub sulfur: f64,
}

/// Mechanical test results for a steel batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MechanicalProperties {
    /// Yield strength in MPa.
    pub yield_strength: f64,
    /// Tensile strength in MPa.
    pub tensile_strength: f64,
    /// Elongation at break in percent.
    pub elongation: f64,
}

/// Full metadata block for a steel batch certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SteelBatchMetadata {
    pub batch_number: String,
    pub grade: String,
    pub chemical_composition: ChemicalComposition,
    pub mechanical_properties: MechanicalProperties,
    pub status: InspectionStatus,
}

impl Default for CertificateMetadata {
    fn default() -> Self {
        Self::Generic {
            status: InspectionStatus::Pending,
            extra: serde_json::Map::new(),
        }
    }
}

impl CertificateMetadata {
    /// The review status carried by any variant.
    pub fn status(&self) -> InspectionStatus {
        match self {
            Self::SteelBatch(batch) => batch.status,
            Self::EvidenceFolder { status } => *status,
            Self::Generic { status, .. } => *status,
        }
    }

    /// Replace the review status, preserving everything else.
    pub fn set_status(&mut self, new_status: InspectionStatus) {
        match self {
            Self::SteelBatch(batch) => batch.status = new_status,
            Self::EvidenceFolder { status } => *status = new_status,
            Self::Generic { status, .. } => *status = new_status,
        }
    }

    /// Normalize a raw JSON bag into a metadata variant.
    ///
    /// Bags written with a `kind` discriminator deserialize directly.
    /// Legacy bags are resolved by field presence: an `evidenceFolder`
    /// marker wins, then any steel-batch field, otherwise `Generic`.
    /// Missing sub-fields get defaults; `status` defaults to `PENDING`.
    pub fn normalize(value: Value) -> Self {
        let obj = match value {
            Value::Object(map) => map,
            _ => return Self::default(),
        };

        if obj.contains_key("kind") {
            if let Ok(meta) = serde_json::from_value(Value::Object(obj.clone())) {
                return meta;
            }
        }

        let status = obj
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<InspectionStatus>().ok())
            .unwrap_or_default();

        if obj
            .get("evidenceFolder")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return Self::EvidenceFolder { status };
        }

        const STEEL_FIELDS: [&str; 4] = [
            "batchNumber",
            "grade",
            "chemicalComposition",
            "mechanicalProperties",
        ];
        if STEEL_FIELDS.iter().any(|f| obj.contains_key(*f)) {
            let mut bag = obj;
            bag.remove("status");
            let mut batch =
                serde_json::from_value::<SteelBatchMetadata>(Value::Object(bag)).unwrap_or_default();
            batch.status = status;
            return Self::SteelBatch(batch);
        }

        let mut extra = obj;
        extra.remove("status");
        Self::Generic { status, extra }
    }

    /// Serialize for storage. Infallible in practice; falls back to an
    /// empty object if serialization is impossible.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }
}
