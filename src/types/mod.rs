//! Core types for detection-sync

mod state;
mod snapshot;
mod objects;
mod intent;
mod output;
mod registration;
mod error;

pub use state::{FaceState, FaceUiState};
pub use snapshot::{DetectionSnapshot, FaceStatusBody, ObjectStatusBody};
pub use objects::{ObjectCounts, ObjectEntry, ObjectTally};
pub use intent::{BadgeStyle, NotificationKind, UiIntent};
pub use output::{IntentRecord, SpeechRecord, Subsystem, now_ms};
pub use registration::{RegistrationForm, RegistrationOutcome, RegistrationRequest, RegistrationResponse};
pub use error::{BackendError, SpeechError, SubmissionError};
