//! Session: owns both subsystems and routes events, commands and frames
//!
//! Everything here runs on the event loop. Poll results arrive as
//! `PollEvent`s in completion order; a late response overwrites whatever an
//! earlier one applied.

use tracing::{info, warn};

use crate::core::announcer::{SpeechChannel, ThrottledAnnouncer};
use crate::core::commands::{Command, HELP};
use crate::core::face::FaceReconciler;
use crate::core::objects::{announcement_text, ObjectAggregator, ObjectPollGate};
use crate::core::view::ViewBinder;
use crate::types::{
    BackendError, DetectionSnapshot, ObjectCounts, RegistrationOutcome, RegistrationRequest,
    RegistrationResponse, Subsystem,
};

/// A finished background request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    Face(Result<DetectionSnapshot, BackendError>),
    Objects(Result<ObjectCounts, BackendError>),
    Registration(Result<RegistrationResponse, BackendError>),
}

/// Keep running or stop after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Tell the user something
    Message(&'static str),
    /// Print the whole view
    Status,
    /// Send this registration in the background
    Submit(RegistrationRequest),
    Exit,
}

/// Both detection subsystems plus the view they drive
pub struct Session<V, S> {
    face: FaceReconciler,
    objects: ObjectAggregator,
    object_gate: ObjectPollGate,
    face_announcer: ThrottledAnnouncer<S>,
    object_announcer: ThrottledAnnouncer<S>,
    view: V,
    admin_mode: bool,
    objects_enabled: bool,
    submission_in_flight: bool,
}

impl<V: ViewBinder, S: SpeechChannel> Session<V, S> {
    /// `face_speech` and `object_speech` are independent channels
    pub fn new(view: V, face_speech: S, object_speech: S, admin_mode: bool) -> Self {
        Self {
            face: FaceReconciler::new(),
            objects: ObjectAggregator::new(),
            object_gate: ObjectPollGate::default(),
            face_announcer: ThrottledAnnouncer::for_face(face_speech),
            object_announcer: ThrottledAnnouncer::for_objects(object_speech),
            view,
            admin_mode,
            objects_enabled: true,
            submission_in_flight: false,
        }
    }

    /// Stop issuing object polls from `frame`
    pub fn without_objects(mut self) -> Self {
        self.objects_enabled = false;
        self
    }

    /// Route a finished request
    pub fn on_event(&mut self, event: PollEvent, now_ms: u64) -> Flow {
        match event {
            PollEvent::Face(result) => {
                self.on_face_poll(result, now_ms);
                Flow::Continue
            }
            PollEvent::Objects(result) => {
                self.on_object_poll(result, now_ms);
                Flow::Continue
            }
            PollEvent::Registration(result) => self.on_registration(result, now_ms),
        }
    }

    pub fn on_face_poll(&mut self, result: Result<DetectionSnapshot, BackendError>, now_ms: u64) {
        match result {
            Ok(snapshot) => {
                let intents = self.face.reconcile(&snapshot);
                self.view.apply(Subsystem::Face, &intents, now_ms);
            }
            Err(e) => warn!(error = %e, "face status poll skipped"),
        }
    }

    pub fn on_object_poll(&mut self, result: Result<ObjectCounts, BackendError>, now_ms: u64) {
        self.object_gate.complete(result.is_ok());
        match result {
            Ok(counts) => {
                let (tally, intent) = self.objects.on_poll(&counts);
                self.view.apply(Subsystem::Object, std::slice::from_ref(&intent), now_ms);
                if let Some(text) = announcement_text(&tally) {
                    self.object_announcer.speak(&text, now_ms);
                }
            }
            Err(e) => warn!(error = %e, "object status poll skipped"),
        }
    }

    pub fn on_registration(
        &mut self,
        result: Result<RegistrationResponse, BackendError>,
        now_ms: u64,
    ) -> Flow {
        self.submission_in_flight = false;
        let outcome = match result {
            Ok(response) => RegistrationOutcome::from(response),
            Err(e) => {
                warn!(error = %e, "registration request failed");
                RegistrationOutcome::Failed(e.into())
            }
        };
        let intents = self.face.registration_finished(&outcome);
        self.view.apply(Subsystem::Face, &intents, now_ms);
        match outcome {
            RegistrationOutcome::Redirect(_) => Flow::Exit,
            _ => Flow::Continue,
        }
    }

    /// Frame callback: expire banners, report whether an object poll is due
    pub fn frame(&mut self, now_ms: u64) -> bool {
        self.view.tick(now_ms);
        self.objects_enabled && self.object_gate.tick(now_ms)
    }

    /// Handle a user action
    pub fn on_command(&mut self, command: Command, now_ms: u64) -> Action {
        match command {
            Command::Speak => {
                match self.face.announceable_name().map(str::to_string) {
                    Some(name) => {
                        if !self.face_announcer.speak(&name, now_ms) {
                            info!("speak request ignored");
                        }
                        Action::None
                    }
                    None => Action::Message("no recognized face to announce"),
                }
            }
            Command::SetName(name) => self.edit_form(|form| form.name = name),
            Command::SetRollNo(roll_no) => self.edit_form(|form| form.roll_no = roll_no),
            Command::Register { roll_no, name } => {
                if let Action::Message(m) = self.edit_form(|form| {
                    form.name = name;
                    form.roll_no = roll_no;
                }) {
                    return Action::Message(m);
                }
                self.submit()
            }
            Command::Submit => self.submit(),
            Command::Cancel => {
                if !self.face.is_registering() {
                    return Action::Message("no registration in progress");
                }
                let intents = self.face.cancel_registration();
                self.view.apply(Subsystem::Face, &intents, now_ms);
                Action::None
            }
            Command::Status => Action::Status,
            Command::Help => Action::Message(HELP),
            Command::Quit => Action::Exit,
        }
    }

    fn edit_form(&mut self, edit: impl FnOnce(&mut crate::types::RegistrationForm)) -> Action {
        if !self.face.is_registering() {
            return Action::Message("no registration in progress");
        }
        edit(&mut self.view.model_mut().form);
        Action::None
    }

    fn submit(&mut self) -> Action {
        if !self.face.is_registering() {
            return Action::Message("no registration in progress");
        }
        if self.submission_in_flight {
            return Action::Message("registration already submitted");
        }
        let form = &self.view.model().form;
        if !form.is_complete() {
            return Action::Message("fill in name and roll number first");
        }
        self.submission_in_flight = true;
        info!(roll_no = %form.roll_no, "submitting registration");
        Action::Submit(form.to_request(self.admin_mode))
    }

    pub fn face(&self) -> &FaceReconciler {
        &self.face
    }

    pub fn objects(&self) -> &ObjectAggregator {
        &self.objects
    }

    pub fn face_announcer(&self) -> &ThrottledAnnouncer<S> {
        &self.face_announcer
    }

    pub fn object_announcer(&self) -> &ThrottledAnnouncer<S> {
        &self.object_announcer
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
