//! Output records for JSON-lines mode

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::UiIntent;

/// Which feed produced an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Face,
    Object,
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subsystem::Face => write!(f, "face"),
            Subsystem::Object => write!(f, "object"),
        }
    }
}

/// One applied intent, stamped for `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRecord {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Feed the intent belongs to
    pub subsystem: Subsystem,
    /// The intent itself
    #[serde(flatten)]
    pub intent: UiIntent,
}

impl IntentRecord {
    /// Create new record stamped now
    pub fn new(subsystem: Subsystem, intent: UiIntent) -> Self {
        Self {
            timestamp: Utc::now(),
            subsystem,
            intent,
        }
    }
}

/// One console announcement, stamped for `--json` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub timestamp: DateTime<Utc>,
    /// Spoken text
    pub speech: String,
    pub rate: f32,
}

impl SpeechRecord {
    pub fn new(speech: impl Into<String>, rate: f32) -> Self {
        Self {
            timestamp: Utc::now(),
            speech: speech.into(),
            rate,
        }
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
