//! Speech channel implementations
//!
//! - `ConsoleSpeech`: prints the utterance, finishes instantly
//! - `CommandSpeech`: drives an external TTS program (espeak-style CLI)

use std::process::{Child, Command, Stdio};

use colored::Colorize;
use tracing::{debug, warn};

use crate::core::announcer::{SpeechChannel, Utterance};
use crate::types::{SpeechError, SpeechRecord};

/// Default espeak speaking rate, words per minute
pub const DEFAULT_WORDS_PER_MINUTE: f32 = 175.0;

/// How `ConsoleSpeech` writes a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    #[default]
    Styled,
    Plain,
    /// One `SpeechRecord` per line, for `--json`
    Json,
}

/// Writes announcements to stdout instead of audio
#[derive(Debug, Default)]
pub struct ConsoleSpeech {
    format: ConsoleFormat,
}

impl ConsoleSpeech {
    pub fn new(no_color: bool) -> Self {
        let format = if no_color {
            ConsoleFormat::Plain
        } else {
            ConsoleFormat::Styled
        };
        Self { format }
    }

    pub fn json() -> Self {
        Self {
            format: ConsoleFormat::Json,
        }
    }

    /// The stdout line for `utterance`
    pub fn line(&self, utterance: &Utterance) -> String {
        match self.format {
            ConsoleFormat::Styled => format!("{} {}", "🔊".bold(), utterance.text.italic()),
            ConsoleFormat::Plain => format!("[speak x{:.1}] {}", utterance.rate, utterance.text),
            ConsoleFormat::Json => {
                let record = SpeechRecord::new(utterance.text.as_str(), utterance.rate);
                serde_json::to_string(&record).unwrap_or_else(|e| {
                    warn!(error = %e, "cannot serialize speech record");
                    String::new()
                })
            }
        }
    }
}

impl SpeechChannel for ConsoleSpeech {
    fn is_speaking(&mut self) -> bool {
        false
    }

    fn cancel(&mut self) {}

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        let line = self.line(utterance);
        if !line.is_empty() {
            println!("{}", line);
        }
        Ok(())
    }
}

/// Spawns `<program> -s <wpm> <text>` per utterance.
///
/// One child at a time; `cancel` kills it.
#[derive(Debug)]
pub struct CommandSpeech {
    program: String,
    words_per_minute: f32,
    child: Option<Child>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            child: None,
        }
    }

    /// Rate flag value for a relative `rate`
    pub fn words_per_minute(&self, rate: f32) -> u32 {
        (self.words_per_minute * rate).round().max(1.0) as u32
    }
}

impl SpeechChannel for CommandSpeech {
    fn is_speaking(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) => {
                self.child = None;
                false
            }
            Err(e) => {
                warn!(program = %self.program, error = %e, "cannot poll speech process");
                self.child = None;
                false
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!(program = %self.program, error = %e, "speech process already gone");
            }
            let _ = child.wait();
        }
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        let child = Command::new(&self.program)
            .arg("-s")
            .arg(self.words_per_minute(utterance.rate).to_string())
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        self.child = Some(child);
        Ok(())
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}
