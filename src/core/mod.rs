//! Core modules for detection-sync

pub mod announcer;
pub mod speech;
pub mod face;
pub mod objects;
pub mod backend;
pub mod view;
pub mod commands;
pub mod session;
pub mod runtime;
pub mod stub;

pub use announcer::{AnnouncementCooldown, SpeechChannel, ThrottledAnnouncer, Utterance};
pub use speech::{CommandSpeech, ConsoleSpeech};
pub use face::{display_name, FaceReconciler};
pub use objects::{aggregate, announcement_text, ObjectAggregator, ObjectPollGate};
pub use backend::{DetectionBackend, HttpBackend};
pub use view::{TerminalOptions, TerminalView, ViewBinder, ViewModel};
pub use commands::{parse_command, Command, CommandError};
pub use session::{Action, Flow, PollEvent, Session};
pub use runtime::{run, run_with_input, RunConfig};
pub use stub::{create_stub_router, create_stub_router_with, run_stub_server};
