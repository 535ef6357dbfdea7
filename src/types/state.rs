//! Face detection state definitions

use serde::{Deserialize, Serialize};

use crate::types::DetectionSnapshot;

/// The three detection states a face snapshot can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceState {
    /// Nothing in frame
    NoFace,
    /// A face is in frame but the backend could not match it
    UnknownFace,
    /// A face is in frame and matched a registered user
    RecognizedFace,
}

impl FaceState {
    /// Classify a snapshot. `face_detected` takes precedence over `recognized`.
    pub fn of(snapshot: &DetectionSnapshot) -> Self {
        if !snapshot.face_detected {
            FaceState::NoFace
        } else if snapshot.recognized {
            FaceState::RecognizedFace
        } else {
            FaceState::UnknownFace
        }
    }
}

impl std::fmt::Display for FaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FaceState::NoFace => "NO_FACE",
            FaceState::UnknownFace => "UNKNOWN_FACE",
            FaceState::RecognizedFace => "RECOGNIZED_FACE",
        };
        write!(f, "{}", name)
    }
}

/// Persistent face UI state, owned by the face reconciler.
///
/// `is_registering` mirrors registration panel visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceUiState {
    /// Registration prompt is open
    pub is_registering: bool,
    /// Previous reconciliation ended in a recognized face
    pub last_recognized: bool,
}
