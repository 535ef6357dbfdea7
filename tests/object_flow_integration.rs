//! Integration tests for the object subsystem
//!
//! Tests the path: frame gate → poll result → ObjectAggregator → view + object announcer

use detection_sync::core::{PollEvent, Session, SpeechChannel, Utterance, ViewModel};
use detection_sync::types::{BackendError, ObjectCounts, ObjectEntry, SpeechError};
use detection_sync::{OBJECT_POLL_INTERVAL_MS, OBJECT_SPEECH_RATE, SPEECH_COOLDOWN_MS};
use pretty_assertions::assert_eq;

#[derive(Debug, Default)]
struct RecordingSpeech {
    speaking: bool,
    spoken: Vec<Utterance>,
    cancels: usize,
}

impl SpeechChannel for RecordingSpeech {
    fn is_speaking(&mut self) -> bool {
        self.speaking
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.speaking = false;
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.speaking = true;
        self.spoken.push(utterance.clone());
        Ok(())
    }
}

fn session() -> Session<ViewModel, RecordingSpeech> {
    Session::new(
        ViewModel::default(),
        RecordingSpeech::default(),
        RecordingSpeech::default(),
        false,
    )
}

fn counts(pairs: &[(&str, u32)]) -> ObjectCounts {
    pairs.iter().map(|(label, count)| (*label, *count)).collect()
}

fn spoken(session: &Session<ViewModel, RecordingSpeech>) -> Vec<String> {
    session
        .object_announcer()
        .channel()
        .spoken
        .iter()
        .map(|u| u.text.clone())
        .collect()
}

#[test]
fn test_multiple_objects_sorted_and_announced() {
    let mut session = session();
    session.on_event(PollEvent::Objects(Ok(counts(&[("a", 2), ("b", 5), ("c", 1)]))), 10_000);

    assert_eq!(session.view().total, 8);
    assert_eq!(
        session.view().objects,
        vec![
            ObjectEntry { label: "b".to_string(), count: 5 },
            ObjectEntry { label: "a".to_string(), count: 2 },
            ObjectEntry { label: "c".to_string(), count: 1 },
        ]
    );
    assert_eq!(spoken(&session), vec!["Multiple objects detected: b, a, c"]);
    assert_eq!(
        session.object_announcer().channel().spoken[0].rate,
        OBJECT_SPEECH_RATE
    );
}

#[test]
fn test_single_object_announcement() {
    let mut session = session();
    session.on_event(PollEvent::Objects(Ok(counts(&[("person", 3)]))), 10_000);
    assert_eq!(spoken(&session), vec!["person detected"]);
}

#[test]
fn test_empty_result_clears_list_without_speech() {
    let mut session = session();
    session.on_event(PollEvent::Objects(Ok(counts(&[("cup", 1)]))), 10_000);
    session.on_event(PollEvent::Objects(Ok(ObjectCounts::new())), 20_000);

    assert_eq!(session.view().total, 0);
    assert!(session.view().objects.is_empty());
    assert_eq!(spoken(&session).len(), 1);
}

#[test]
fn test_cooldown_suppresses_speech_but_not_ui() {
    let mut session = session();
    session.on_event(PollEvent::Objects(Ok(counts(&[("cup", 1)]))), 10_000);
    session.on_event(
        PollEvent::Objects(Ok(counts(&[("dog", 2)]))),
        10_000 + OBJECT_POLL_INTERVAL_MS,
    );

    assert_eq!(session.view().objects[0].label, "dog");
    assert_eq!(spoken(&session), vec!["cup detected"]);

    session.on_event(
        PollEvent::Objects(Ok(counts(&[("dog", 2)]))),
        10_000 + SPEECH_COOLDOWN_MS,
    );
    assert_eq!(spoken(&session), vec!["cup detected", "dog detected"]);
    // first utterance was still "playing"
    assert_eq!(session.object_announcer().channel().cancels, 1);
}

#[test]
fn test_failed_poll_keeps_previous_tally() {
    let mut session = session();
    session.on_event(PollEvent::Objects(Ok(counts(&[("cup", 4)]))), 10_000);
    session.on_event(
        PollEvent::Objects(Err(BackendError::decode("/object_status", "invalid count -1"))),
        12_000,
    );
    assert_eq!(session.view().total, 4);
}

#[test]
fn test_frame_gate_cadence() {
    let mut session = session();

    assert!(session.frame(1_000));
    // in flight: later frames wait
    assert!(!session.frame(1_016));
    session.on_event(PollEvent::Objects(Ok(counts(&[("cup", 1)]))), 1_200);

    assert!(!session.frame(1_000 + OBJECT_POLL_INTERVAL_MS - 1));
    assert!(session.frame(1_000 + OBJECT_POLL_INTERVAL_MS));
}

#[test]
fn test_frame_gate_disabled_without_objects() {
    let mut session = session().without_objects();
    assert!(!session.frame(1_000));
    assert!(!session.frame(100_000));
}
