//! Face Reconciler: registration prompt state machine
//!
//! Rules, first match wins:
//! - no face: close prompt, last_recognized = false, badge "No Face Detected"
//! - recognized: close prompt, last_recognized = true, badge = name, voice control on
//! - unknown: open prompt only if closed AND the previous frame was not
//!   recognized; badge "Unknown Face Detected", voice control off,
//!   last_recognized = false
//!
//! The prompt opens once per unknown-face episode and stays open until the
//! face is recognized, lost, cancelled, or registered.

use tracing::{debug, info};

use crate::types::{
    BadgeStyle, DetectionSnapshot, FaceState, FaceUiState, NotificationKind, RegistrationOutcome,
    UiIntent,
};
use crate::{NO_FACE_TEXT, UNKNOWN_FACE_TEXT};

/// Badge text used when the backend recognizes a face but sends no label
const UNNAMED_FACE_TEXT: &str = "Recognized Face";

/// Face reconciliation state machine
#[derive(Debug, Clone, Default)]
pub struct FaceReconciler {
    /// Prompt + recognition memory
    ui: FaceUiState,
    /// Did the latest snapshot contain a face
    face_detected: bool,
    /// Current badge text
    badge_text: String,
    /// Current badge class
    badge_style: Option<BadgeStyle>,
}

impl FaceReconciler {
    /// Create reconciler in the startup state
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an explicit state
    pub fn with_state(ui: FaceUiState) -> Self {
        Self {
            ui,
            ..Self::default()
        }
    }

    /// Fold one poll snapshot into local state, return UI intents
    pub fn reconcile(&mut self, snapshot: &DetectionSnapshot) -> Vec<UiIntent> {
        self.face_detected = snapshot.face_detected;
        let was_recognized = self.ui.last_recognized;

        let state = FaceState::of(snapshot);
        let mut intents = Vec::with_capacity(3);

        match state {
            FaceState::NoFace => {
                intents.push(self.set_badge(NO_FACE_TEXT.to_string(), BadgeStyle::Unrecognized));
                intents.push(UiIntent::voice_control(false));
                intents.push(self.close_prompt());
                self.ui.last_recognized = false;
            }

            FaceState::RecognizedFace => {
                let name = snapshot
                    .name
                    .clone()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| UNNAMED_FACE_TEXT.to_string());
                intents.push(self.set_badge(name, BadgeStyle::Recognized));
                intents.push(UiIntent::voice_control(true));
                intents.push(self.close_prompt());
                self.ui.last_recognized = true;
            }

            FaceState::UnknownFace => {
                intents.push(
                    self.set_badge(UNKNOWN_FACE_TEXT.to_string(), BadgeStyle::Unrecognized),
                );
                intents.push(UiIntent::voice_control(false));
                if !self.ui.is_registering && !was_recognized {
                    self.ui.is_registering = true;
                    info!("unknown face, opening registration prompt");
                    intents.push(UiIntent::panel(true));
                }
                self.ui.last_recognized = false;
            }
        }

        debug!(%state, is_registering = self.ui.is_registering, "face reconciled");
        intents
    }

    /// Name to speak for the manual announce action, if announcing is allowed.
    ///
    /// Needs `last_recognized` and a face in frame, and also a badge styled as
    /// recognized. A successful registration sets `last_recognized` while the
    /// badge still reads "Unknown Face Detected" and the voice control is
    /// hidden, so there is no name to speak until the next recognized poll.
    pub fn announceable_name(&self) -> Option<&str> {
        if !(self.ui.last_recognized && self.face_detected) {
            return None;
        }
        if self.badge_style != Some(BadgeStyle::Recognized) {
            return None;
        }
        let name = display_name(&self.badge_text);
        (!name.is_empty()).then_some(name)
    }

    /// Apply a finished registration submission
    pub fn registration_finished(&mut self, outcome: &RegistrationOutcome) -> Vec<UiIntent> {
        match outcome {
            RegistrationOutcome::Redirect(url) => {
                info!(%url, "registration redirected");
                vec![UiIntent::Navigate { url: url.clone() }]
            }
            RegistrationOutcome::Registered => {
                info!("face registered");
                self.ui.is_registering = false;
                self.ui.last_recognized = true;
                vec![
                    UiIntent::notify("Face registered successfully!", NotificationKind::Success),
                    UiIntent::panel(false),
                    UiIntent::ResetRegistrationForm,
                ]
            }
            RegistrationOutcome::Failed(err) => {
                info!(error = %err, "registration failed");
                vec![UiIntent::notify(err.user_message(), NotificationKind::Error)]
            }
        }
    }

    /// User dismissed the registration prompt
    pub fn cancel_registration(&mut self) -> Vec<UiIntent> {
        self.ui.is_registering = false;
        vec![UiIntent::panel(false), UiIntent::ResetRegistrationForm]
    }

    /// Get persistent UI state
    pub fn ui_state(&self) -> FaceUiState {
        self.ui
    }

    /// Is the registration prompt open?
    pub fn is_registering(&self) -> bool {
        self.ui.is_registering
    }

    /// Did the latest snapshot contain a face?
    pub fn face_detected(&self) -> bool {
        self.face_detected
    }

    /// Current badge text
    pub fn badge_text(&self) -> &str {
        &self.badge_text
    }

    fn set_badge(&mut self, text: String, style: BadgeStyle) -> UiIntent {
        self.badge_text = text.clone();
        self.badge_style = Some(style);
        UiIntent::badge(text, style)
    }

    fn close_prompt(&mut self) -> UiIntent {
        self.ui.is_registering = false;
        UiIntent::panel(false)
    }
}

/// Strip the " (<roll number>)" suffix the backend appends to recognized names
pub fn display_name(label: &str) -> &str {
    label.split(" (").next().unwrap_or(label).trim()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubmissionError;

    fn panel_intents(intents: &[UiIntent]) -> Vec<bool> {
        intents
            .iter()
            .filter_map(|intent| match intent {
                UiIntent::SetPanelVisible { visible } => Some(*visible),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let face = FaceReconciler::new();
        assert_eq!(face.ui_state(), FaceUiState::default());
        assert!(!face.face_detected());
    }

    #[test]
    fn test_unknown_face_opens_prompt() {
        let mut face = FaceReconciler::new();
        let intents = face.reconcile(&DetectionSnapshot::unknown());
        assert!(face.is_registering());
        assert_eq!(panel_intents(&intents), vec![true]);
        assert!(intents.contains(&UiIntent::badge(UNKNOWN_FACE_TEXT, BadgeStyle::Unrecognized)));
    }

    #[test]
    fn test_prompt_opens_once_per_episode() {
        let mut face = FaceReconciler::new();
        let opens: usize = (0..3)
            .map(|_| face.reconcile(&DetectionSnapshot::unknown()))
            .map(|intents| panel_intents(&intents).iter().filter(|v| **v).count())
            .sum();
        assert_eq!(opens, 1);
        assert!(face.is_registering());
    }

    #[test]
    fn test_no_reopen_right_after_recognition() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::recognized("Asha (21CS042)"));
        let intents = face.reconcile(&DetectionSnapshot::unknown());
        assert!(!face.is_registering());
        assert!(panel_intents(&intents).is_empty());

        // second unknown frame is a fresh episode
        let intents = face.reconcile(&DetectionSnapshot::unknown());
        assert!(face.is_registering());
        assert_eq!(panel_intents(&intents), vec![true]);
    }

    #[test]
    fn test_recognized_closes_prompt_and_shows_voice() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::unknown());
        let intents = face.reconcile(&DetectionSnapshot::recognized("Asha (21CS042)"));
        assert!(!face.is_registering());
        assert!(face.ui_state().last_recognized);
        assert!(intents.contains(&UiIntent::voice_control(true)));
        assert!(intents.contains(&UiIntent::badge("Asha (21CS042)", BadgeStyle::Recognized)));
    }

    #[test]
    fn test_lost_face_resets() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::unknown());
        let intents = face.reconcile(&DetectionSnapshot::no_face());
        assert!(!face.is_registering());
        assert!(!face.ui_state().last_recognized);
        assert_eq!(panel_intents(&intents), vec![false]);
        assert!(intents.contains(&UiIntent::badge(NO_FACE_TEXT, BadgeStyle::Unrecognized)));
    }

    #[test]
    fn test_recognized_without_name_uses_placeholder() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot {
            face_detected: true,
            recognized: true,
            name: None,
        });
        assert_eq!(face.badge_text(), UNNAMED_FACE_TEXT);
    }

    #[test]
    fn test_announceable_name_strips_roll_number() {
        let mut face = FaceReconciler::new();
        assert_eq!(face.announceable_name(), None);
        face.reconcile(&DetectionSnapshot::recognized("Asha Rao (21CS042)"));
        assert_eq!(face.announceable_name(), Some("Asha Rao"));
        face.reconcile(&DetectionSnapshot::no_face());
        assert_eq!(face.announceable_name(), None);
    }

    #[test]
    fn test_registration_success_forces_recognized() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::unknown());
        let intents = face.registration_finished(&RegistrationOutcome::Registered);
        assert!(!face.is_registering());
        assert!(face.ui_state().last_recognized);
        assert!(intents.contains(&UiIntent::panel(false)));
        assert!(intents.contains(&UiIntent::ResetRegistrationForm));

        // backend has not caught up yet: prompt must not reopen
        face.reconcile(&DetectionSnapshot::unknown());
        assert!(!face.is_registering());
    }

    #[test]
    fn test_no_announce_until_badge_recognized() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::unknown());
        face.registration_finished(&RegistrationOutcome::Registered);
        assert!(face.ui_state().last_recognized);
        assert_eq!(face.announceable_name(), None);

        face.reconcile(&DetectionSnapshot::recognized("Asha (21CS042)"));
        assert_eq!(face.announceable_name(), Some("Asha"));
    }

    #[test]
    fn test_registration_failure_keeps_state() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::unknown());
        let before = face.ui_state();
        let intents =
            face.registration_finished(&RegistrationOutcome::Failed(SubmissionError::Rejected));
        assert_eq!(face.ui_state(), before);
        assert_eq!(
            intents,
            vec![UiIntent::notify(
                "Registration failed. Please try again.",
                NotificationKind::Error
            )]
        );
    }

    #[test]
    fn test_redirect_changes_nothing_locally() {
        let mut face = FaceReconciler::new();
        face.reconcile(&DetectionSnapshot::unknown());
        let before = face.ui_state();
        let intents = face.registration_finished(&RegistrationOutcome::Redirect(
            "/admin/face-records".to_string(),
        ));
        assert_eq!(face.ui_state(), before);
        assert_eq!(
            intents,
            vec![UiIntent::Navigate {
                url: "/admin/face-records".to_string()
            }]
        );
    }

    #[test]
    fn test_cancel_keeps_last_recognized() {
        let mut face = FaceReconciler::with_state(FaceUiState {
            is_registering: true,
            last_recognized: true,
        });
        face.cancel_registration();
        assert_eq!(
            face.ui_state(),
            FaceUiState {
                is_registering: false,
                last_recognized: true,
            }
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Asha (21CS042)"), "Asha");
        assert_eq!(display_name("Asha"), "Asha");
        assert_eq!(display_name(""), "");
    }
}
