//! detection-sync: live face and object detection status client
//!
//! Polls a detection backend, reconciles each snapshot into local UI state,
//! and throttles voice announcements per subsystem.

pub mod core;
pub mod logging;
pub mod types;

// =============================================================================
// POLLING CADENCE
// =============================================================================

/// Face status poll period (milliseconds), fixed and non-adaptive
pub const FACE_POLL_INTERVAL_MS: u64 = 500;

/// Minimum time between completed object status updates (milliseconds)
pub const OBJECT_POLL_INTERVAL_MS: u64 = 2000;

/// Per-frame check period for the object poller (~60 fps)
pub const FRAME_INTERVAL_MS: u64 = 16;

// =============================================================================
// ANNOUNCEMENTS
// =============================================================================

/// Cooldown between utterances of one subsystem (milliseconds)
pub const SPEECH_COOLDOWN_MS: u64 = 3000;

/// Speech rate for face announcements, relative to the channel default
pub const FACE_SPEECH_RATE: f32 = 0.9;

/// Speech rate for object announcements, relative to the channel default
pub const OBJECT_SPEECH_RATE: f32 = 1.0;

// =============================================================================
// UI
// =============================================================================

/// Transient notification lifetime (milliseconds)
pub const NOTIFICATION_TTL_MS: u64 = 3000;

/// Badge text when no face is in frame
pub const NO_FACE_TEXT: &str = "No Face Detected";

/// Badge text when a face is in frame but not recognized
pub const UNKNOWN_FACE_TEXT: &str = "Unknown Face Detected";

// =============================================================================
// BACKEND
// =============================================================================

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
