//! Event loop: timers, background requests, stdin commands
//!
//! Single-threaded. Blocking HTTP calls run on the blocking pool and post a
//! `PollEvent` back; state is only touched inside the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::announcer::SpeechChannel;
use crate::core::backend::{
    DetectionBackend, FACE_STATUS_PATH, OBJECT_STATUS_PATH, REGISTER_FACE_PATH,
};
use crate::core::commands::parse_command;
use crate::core::session::{Action, Flow, PollEvent, Session};
use crate::core::view::ViewBinder;
use crate::types::{now_ms, BackendError};
use crate::{FACE_POLL_INTERVAL_MS, FRAME_INTERVAL_MS};

/// Which loops to run
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub face_enabled: bool,
    /// Read commands from stdin
    pub interactive: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            face_enabled: true,
            interactive: true,
        }
    }
}

/// Run until quit, Ctrl-C, or a registration redirect, reading commands from
/// stdin. Returns the session as it was left.
pub async fn run<B, V, S>(backend: Arc<B>, session: Session<V, S>, config: RunConfig) -> Session<V, S>
where
    B: DetectionBackend,
    V: ViewBinder,
    S: SpeechChannel,
{
    run_with_input(backend, session, config, BufReader::new(tokio::io::stdin())).await
}

/// `run` with commands read from `input`
pub async fn run_with_input<B, V, S, R>(
    backend: Arc<B>,
    mut session: Session<V, S>,
    config: RunConfig,
    input: R,
) -> Session<V, S>
where
    B: DetectionBackend,
    V: ViewBinder,
    S: SpeechChannel,
    R: AsyncBufRead + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<PollEvent>();

    let mut face_timer = time::interval(Duration::from_millis(FACE_POLL_INTERVAL_MS));
    face_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut frame_timer = time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
    frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = input.lines();
    let mut stdin_open = config.interactive;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(face = config.face_enabled, "polling started");

    loop {
        tokio::select! {
            _ = face_timer.tick(), if config.face_enabled => {
                spawn_request(&backend, &tx, FACE_STATUS_PATH, PollEvent::Face, |b| b.face_status());
            }

            _ = frame_timer.tick() => {
                if session.frame(now_ms()) {
                    spawn_request(&backend, &tx, OBJECT_STATUS_PATH, PollEvent::Objects, |b| b.object_status());
                }
            }

            Some(event) = rx.recv() => {
                if session.on_event(event, now_ms()) == Flow::Exit {
                    info!("leaving after navigation");
                    break;
                }
            }

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let command = match parse_command(&line) {
                        None => continue,
                        Some(Err(e)) => {
                            session.view().reply(&e.to_string());
                            continue;
                        }
                        Some(Ok(command)) => command,
                    };
                    match session.on_command(command, now_ms()) {
                        Action::None => {}
                        Action::Message(text) => session.view().reply(text),
                        Action::Status => session.view().print_status(),
                        Action::Submit(request) => {
                            spawn_request(&backend, &tx, REGISTER_FACE_PATH, PollEvent::Registration, move |b| {
                                b.register_face(&request)
                            });
                        }
                        Action::Exit => break,
                    }
                }
                Ok(None) => {
                    debug!("stdin closed, continuing without commands");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "stdin unreadable, continuing without commands");
                    stdin_open = false;
                }
            },

            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }
    }

    session
}

/// Run `call` on the blocking pool and post its result, wrapped by `wrap`.
/// A panicking call is reported as a transport failure on `endpoint`.
fn spawn_request<B, T, W, F>(
    backend: &Arc<B>,
    tx: &UnboundedSender<PollEvent>,
    endpoint: &'static str,
    wrap: W,
    call: F,
) where
    B: DetectionBackend,
    T: Send + 'static,
    W: FnOnce(Result<T, BackendError>) -> PollEvent + Send + 'static,
    F: FnOnce(&B) -> Result<T, BackendError> + Send + 'static,
{
    let backend = Arc::clone(backend);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = match tokio::task::spawn_blocking(move || call(&backend)).await {
            Ok(result) => result,
            Err(e) => Err(BackendError::transport(endpoint, e.to_string())),
        };
        // receiver only drops at shutdown
        let _ = tx.send(wrap(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::AsyncWriteExt;

    use crate::core::announcer::Utterance;
    use crate::core::view::ViewModel;
    use crate::types::{
        DetectionSnapshot, ObjectCounts, RegistrationRequest, RegistrationResponse, SpeechError,
    };

    struct Silent;

    impl SpeechChannel for Silent {
        fn is_speaking(&mut self) -> bool {
            false
        }

        fn cancel(&mut self) {}

        fn speak(&mut self, _utterance: &Utterance) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    /// Unknown face in frame, nothing else; registrations redirect
    #[derive(Debug, Default)]
    struct ScriptedBackend {
        face_polls: AtomicUsize,
        panic_on_face: bool,
    }

    impl DetectionBackend for ScriptedBackend {
        fn face_status(&self) -> Result<DetectionSnapshot, BackendError> {
            self.face_polls.fetch_add(1, Ordering::SeqCst);
            if self.panic_on_face {
                panic!("camera driver crashed");
            }
            Ok(DetectionSnapshot::unknown())
        }

        fn object_status(&self) -> Result<ObjectCounts, BackendError> {
            Ok(ObjectCounts::new())
        }

        fn register_face(
            &self,
            _request: &RegistrationRequest,
        ) -> Result<RegistrationResponse, BackendError> {
            Ok(RegistrationResponse {
                success: true,
                redirect: Some("/admin/face-records".to_string()),
            })
        }
    }

    fn session() -> Session<ViewModel, Silent> {
        Session::new(ViewModel::default(), Silent, Silent, true)
    }

    const CONFIG: RunConfig = RunConfig {
        face_enabled: true,
        interactive: true,
    };

    #[tokio::test]
    async fn test_panicking_call_becomes_transport_error() {
        let backend = Arc::new(ScriptedBackend {
            panic_on_face: true,
            ..Default::default()
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_request(&backend, &tx, FACE_STATUS_PATH, PollEvent::Face, |b| b.face_status());

        match rx.recv().await {
            Some(PollEvent::Face(Err(BackendError::Transport { endpoint, .. }))) => {
                assert_eq!(endpoint, FACE_STATUS_PATH);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_registration_redirect_ends_run() {
        let backend = Arc::new(ScriptedBackend::default());
        let (reader, mut writer) = tokio::io::duplex(256);
        tokio::spawn(async move {
            // first face poll opens the prompt
            time::sleep(Duration::from_millis(200)).await;
            writer.write_all(b"register 21CS042 Asha\n").await.unwrap();
        });

        let run = run_with_input(backend, session(), CONFIG, BufReader::new(reader));
        let session = time::timeout(Duration::from_secs(5), run)
            .await
            .expect("redirect should end the run");

        assert_eq!(
            session.view().navigated_to.as_deref(),
            Some("/admin/face-records")
        );
    }

    #[tokio::test]
    async fn test_quit_command_ends_run() {
        let backend = Arc::new(ScriptedBackend::default());
        let run = run_with_input(backend, session(), CONFIG, &b"\nquit\n"[..]);
        assert!(time::timeout(Duration::from_secs(5), run).await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_input_keeps_polling() {
        let backend = Arc::new(ScriptedBackend::default());
        let run = run_with_input(Arc::clone(&backend), session(), CONFIG, &b""[..]);

        // EOF disables commands but not the timers
        assert!(time::timeout(Duration::from_millis(1_200), run).await.is_err());
        assert!(backend.face_polls.load(Ordering::SeqCst) >= 2);
    }
}
