//! Throttled Announcer: cooldown + pre-emption gate in front of a speech channel
//!
//! Rules:
//! - Within `cooldown_ms` of the last successful utterance: no-op
//! - Otherwise: cancel whatever is still playing, then speak
//! - The cooldown is stamped only when the channel accepts the utterance

use tracing::{debug, warn};

use crate::types::{SpeechError, Subsystem};
use crate::{FACE_SPEECH_RATE, OBJECT_SPEECH_RATE, SPEECH_COOLDOWN_MS};

/// Text plus rate handed to a speech channel
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Multiplier on the channel's default rate
    pub rate: f32,
}

/// Output device for spoken announcements
pub trait SpeechChannel {
    /// Is an utterance still producing output?
    fn is_speaking(&mut self) -> bool;
    /// Stop the current utterance, if any
    fn cancel(&mut self);
    /// Start speaking `utterance`
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;
}

impl<S: SpeechChannel + ?Sized> SpeechChannel for Box<S> {
    fn is_speaking(&mut self) -> bool {
        (**self).is_speaking()
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        (**self).speak(utterance)
    }
}

/// Time of the last successful utterance for one subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementCooldown {
    last_spoken_at_ms: Option<u64>,
    cooldown_ms: u64,
}

impl Default for AnnouncementCooldown {
    fn default() -> Self {
        Self::new(SPEECH_COOLDOWN_MS)
    }
}

impl AnnouncementCooldown {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            last_spoken_at_ms: None,
            cooldown_ms,
        }
    }

    /// Still inside the quiet window at `now_ms`?
    pub fn is_active(&self, now_ms: u64) -> bool {
        match self.last_spoken_at_ms {
            Some(at) => now_ms.saturating_sub(at) < self.cooldown_ms,
            None => false,
        }
    }

    pub fn stamp(&mut self, now_ms: u64) {
        self.last_spoken_at_ms = Some(now_ms);
    }

    pub fn last_spoken_at_ms(&self) -> Option<u64> {
        self.last_spoken_at_ms
    }
}

/// Cooldown-gated, cancel-then-speak front for one subsystem's channel
#[derive(Debug)]
pub struct ThrottledAnnouncer<S> {
    subsystem: Subsystem,
    channel: S,
    cooldown: AnnouncementCooldown,
    rate: f32,
}

impl<S: SpeechChannel> ThrottledAnnouncer<S> {
    pub fn new(subsystem: Subsystem, channel: S, cooldown: AnnouncementCooldown, rate: f32) -> Self {
        Self {
            subsystem,
            channel,
            cooldown,
            rate,
        }
    }

    /// Face announcer: default cooldown, 0.9x rate
    pub fn for_face(channel: S) -> Self {
        Self::new(Subsystem::Face, channel, AnnouncementCooldown::default(), FACE_SPEECH_RATE)
    }

    /// Object announcer: default cooldown, 1.0x rate
    pub fn for_objects(channel: S) -> Self {
        Self::new(Subsystem::Object, channel, AnnouncementCooldown::default(), OBJECT_SPEECH_RATE)
    }

    /// Speak `text` unless the cooldown is active. Returns whether it spoke.
    pub fn speak(&mut self, text: &str, now_ms: u64) -> bool {
        if self.cooldown.is_active(now_ms) {
            debug!(subsystem = %self.subsystem, text, "announcement suppressed by cooldown");
            return false;
        }

        if self.channel.is_speaking() {
            debug!(subsystem = %self.subsystem, "pre-empting stale utterance");
            self.channel.cancel();
        }

        let utterance = Utterance {
            text: text.to_string(),
            rate: self.rate,
        };
        match self.channel.speak(&utterance) {
            Ok(()) => {
                self.cooldown.stamp(now_ms);
                true
            }
            Err(e) => {
                warn!(subsystem = %self.subsystem, error = %e, "speech dispatch failed");
                false
            }
        }
    }

    pub fn cooldown(&self) -> &AnnouncementCooldown {
        &self.cooldown
    }

    pub fn channel(&self) -> &S {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut S {
        &mut self.channel
    }
}
