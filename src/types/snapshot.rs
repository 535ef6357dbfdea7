//! Snapshot types decoded from the detection backend
//!
//! Wire structs mirror the JSON bodies exactly; domain snapshots are what the
//! reconcilers consume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{BackendError, ObjectCounts};

/// Body of `GET /face_status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceStatusBody {
    pub face_detected: bool,
    pub recognized: bool,
    /// Null whenever the face is not recognized
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `GET /object_status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStatusBody {
    /// Missing or null means nothing detected
    #[serde(default)]
    pub objects: Option<BTreeMap<String, i64>>,
}

/// One face poll's view of the detector, kept for a single reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionSnapshot {
    pub face_detected: bool,
    pub recognized: bool,
    /// Present only when `recognized`
    pub name: Option<String>,
}

impl DetectionSnapshot {
    /// No face in frame
    pub fn no_face() -> Self {
        Self::default()
    }

    /// A face the backend could not match
    pub fn unknown() -> Self {
        Self {
            face_detected: true,
            recognized: false,
            name: None,
        }
    }

    /// A matched face with its display label
    pub fn recognized(name: impl Into<String>) -> Self {
        Self {
            face_detected: true,
            recognized: true,
            name: Some(name.into()),
        }
    }
}

impl From<FaceStatusBody> for DetectionSnapshot {
    fn from(body: FaceStatusBody) -> Self {
        let name = if body.recognized { body.name } else { None };
        Self {
            face_detected: body.face_detected,
            recognized: body.recognized,
            name,
        }
    }
}

impl TryFrom<ObjectStatusBody> for ObjectCounts {
    type Error = BackendError;

    fn try_from(body: ObjectStatusBody) -> Result<Self, Self::Error> {
        ObjectCounts::from_raw(body.objects.unwrap_or_default())
    }
}
