//! View Binder: applies intents to the visible UI
//!
//! `ViewModel` is the pure element state (badge, panel, voice control, form,
//! tally, banner). `TerminalView` wraps it and prints whatever changed.

use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::types::{
    BadgeStyle, IntentRecord, NotificationKind, ObjectEntry, RegistrationForm, Subsystem,
    UiIntent,
};
use crate::NOTIFICATION_TTL_MS;

/// A visible banner and when it disappears
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at_ms: u64,
}

/// Concrete state of every UI element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub badge_text: String,
    pub badge_style: BadgeStyle,
    pub panel_visible: bool,
    pub voice_control_visible: bool,
    pub form: RegistrationForm,
    pub objects: Vec<ObjectEntry>,
    pub total: u64,
    pub notification: Option<Notification>,
    pub navigated_to: Option<String>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            badge_text: String::new(),
            badge_style: BadgeStyle::Unrecognized,
            panel_visible: false,
            voice_control_visible: false,
            form: RegistrationForm::default(),
            objects: Vec::new(),
            total: 0,
            notification: None,
            navigated_to: None,
        }
    }
}

impl ViewModel {
    /// Apply one intent; returns whether anything visible changed
    pub fn apply(&mut self, intent: &UiIntent, now_ms: u64) -> bool {
        match intent {
            UiIntent::SetBadge { text, style } => {
                let changed = self.badge_text != *text || self.badge_style != *style;
                self.badge_text = text.clone();
                self.badge_style = *style;
                changed
            }
            UiIntent::SetPanelVisible { visible } => {
                replace(&mut self.panel_visible, *visible)
            }
            UiIntent::SetVoiceControlVisible { visible } => {
                replace(&mut self.voice_control_visible, *visible)
            }
            UiIntent::ResetRegistrationForm => {
                let changed = self.form != RegistrationForm::default();
                self.form.reset();
                changed
            }
            UiIntent::RenderObjects { entries, total } => {
                let changed = self.objects != *entries || self.total != *total;
                self.objects = entries.clone();
                self.total = *total;
                changed
            }
            UiIntent::Notify { message, kind } => {
                self.notification = Some(Notification {
                    message: message.clone(),
                    kind: *kind,
                    expires_at_ms: now_ms + NOTIFICATION_TTL_MS,
                });
                true
            }
            UiIntent::Navigate { url } => {
                self.navigated_to = Some(url.clone());
                true
            }
        }
    }

    /// Drop an expired banner; returns whether one was dismissed
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match &self.notification {
            Some(banner) if now_ms >= banner.expires_at_ms => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }
}

fn replace(slot: &mut bool, value: bool) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

/// Anything that can display intents
pub trait ViewBinder {
    fn apply(&mut self, subsystem: Subsystem, intents: &[UiIntent], now_ms: u64);
    /// Frame callback for time-based effects (banner auto-dismiss)
    fn tick(&mut self, now_ms: u64);
    fn model(&self) -> &ViewModel;
    /// Form fields are edited by the user directly
    fn model_mut(&mut self) -> &mut ViewModel;
    /// Print the whole UI on request
    fn print_status(&self) {}
    /// Answer to a typed command
    fn reply(&self, text: &str) {
        println!("{}", text);
    }
}

impl ViewBinder for ViewModel {
    fn apply(&mut self, _subsystem: Subsystem, intents: &[UiIntent], now_ms: u64) {
        for intent in intents {
            ViewModel::apply(self, intent, now_ms);
        }
    }

    fn tick(&mut self, now_ms: u64) {
        ViewModel::tick(self, now_ms);
    }

    fn model(&self) -> &ViewModel {
        self
    }

    fn model_mut(&mut self) -> &mut ViewModel {
        self
    }
}

/// How the terminal view prints
#[derive(Debug, Clone, Default)]
pub struct TerminalOptions {
    /// One JSON record per applied intent instead of styled text
    pub json: bool,
    pub no_color: bool,
    /// Open navigation targets in the system browser
    pub open_links: bool,
}

/// Prints changes to stdout
#[derive(Debug)]
pub struct TerminalView {
    model: ViewModel,
    options: TerminalOptions,
    base_url: Url,
}

impl TerminalView {
    pub fn new(options: TerminalOptions, base_url: Url) -> Self {
        if options.no_color {
            colored::control::set_override(false);
        }
        Self {
            model: ViewModel::default(),
            options,
            base_url,
        }
    }

    fn render(&self, subsystem: Subsystem, intent: &UiIntent) {
        if self.options.json {
            let record = IntentRecord::new(subsystem, intent.clone());
            match serde_json::to_string(&record) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!(error = %e, "cannot serialize intent"),
            }
            return;
        }

        match intent {
            UiIntent::SetBadge { .. } | UiIntent::SetVoiceControlVisible { .. } => {
                println!("{}", self.badge_line());
            }
            UiIntent::SetPanelVisible { visible: true } => {
                println!("{}", "┌─ Register this face ─────────────────────".yellow());
                println!("{}", "│  name <text>   roll <text>   submit".yellow());
                println!("{}", "│  register <roll_no> <name…>   cancel".yellow());
                println!("{}", "└───────────────────────────────────────────".yellow());
            }
            UiIntent::SetPanelVisible { visible: false } => {
                println!("{}", "  registration panel closed".dimmed());
            }
            UiIntent::ResetRegistrationForm => {}
            UiIntent::RenderObjects { .. } => self.print_objects(),
            UiIntent::Notify { message, kind } => {
                let banner = match kind {
                    NotificationKind::Success => format!("✓ {}", message).green().bold(),
                    NotificationKind::Error => format!("✗ {}", message).red().bold(),
                };
                println!("{}", banner);
            }
            UiIntent::Navigate { url } => println!("→ navigating to {}", url),
        }
    }

    fn badge_line(&self) -> String {
        let badge = match self.model.badge_style {
            BadgeStyle::Recognized => format!("● {}", self.model.badge_text).green().bold(),
            BadgeStyle::Unrecognized => format!("○ {}", self.model.badge_text).red(),
        };
        if self.model.voice_control_visible {
            format!("{}  {}", badge, "[speak]".cyan())
        } else {
            badge.to_string()
        }
    }

    fn print_objects(&self) {
        println!("{} {}", "Objects:".bold(), self.model.total);
        for entry in &self.model.objects {
            println!("  {:<20} {}", entry.label, entry.count);
        }
    }

    /// Resolve a navigation target, relative or absolute, against the backend
    pub fn resolve(&self, target: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(target)
    }

    fn navigate(&self, target: &str) {
        let url = match self.resolve(target) {
            Ok(url) => url,
            Err(e) => {
                warn!(destination = target, error = %e, "cannot resolve navigation target");
                return;
            }
        };
        info!(%url, "navigating");
        if self.options.open_links {
            if let Err(e) = open::that(url.as_str()) {
                warn!(%url, error = %e, "cannot open browser");
            }
        }
    }

    /// The whole view as one JSON line
    pub fn status_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.model)
    }

    fn print_full(&self) {
        if self.options.json {
            match self.status_json() {
                Ok(line) => println!("{}", line),
                Err(e) => warn!(error = %e, "cannot serialize view"),
            }
            return;
        }
        println!("{}", self.badge_line());
        if self.model.panel_visible {
            println!(
                "  registering: name={:?} roll_no={:?}",
                self.model.form.name, self.model.form.roll_no
            );
        }
        self.print_objects();
        if let Some(banner) = &self.model.notification {
            println!("  notice: {}", banner.message);
        }
    }
}

impl ViewBinder for TerminalView {
    fn apply(&mut self, subsystem: Subsystem, intents: &[UiIntent], now_ms: u64) {
        for intent in intents {
            if self.model.apply(intent, now_ms) {
                self.render(subsystem, intent);
            }
            if let UiIntent::Navigate { url } = intent {
                self.navigate(url);
            }
        }
    }

    fn tick(&mut self, now_ms: u64) {
        if self.model.tick(now_ms) && !self.options.json {
            println!("{}", "  (notice dismissed)".dimmed());
        }
    }

    fn model(&self) -> &ViewModel {
        &self.model
    }

    fn model_mut(&mut self) -> &mut ViewModel {
        &mut self.model
    }

    fn print_status(&self) {
        self.print_full();
    }

    fn reply(&self, text: &str) {
        // stdout carries only JSON records in json mode
        if self.options.json {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_badge_reports_no_change() {
        let mut model = ViewModel::default();
        let badge = UiIntent::badge("No Face Detected", BadgeStyle::Unrecognized);
        assert!(model.apply(&badge, 0));
        assert!(!model.apply(&badge, 500));
    }

    #[test]
    fn test_notification_auto_dismiss() {
        let mut model = ViewModel::default();
        model.apply(&UiIntent::notify("Network error. Please try again.", NotificationKind::Error), 1_000);
        assert!(!model.tick(1_000 + NOTIFICATION_TTL_MS - 1));
        assert!(model.notification.is_some());
        assert!(model.tick(1_000 + NOTIFICATION_TTL_MS));
        assert!(model.notification.is_none());
    }

    #[test]
    fn test_reset_form() {
        let mut model = ViewModel::default();
        model.form.name = "Asha".to_string();
        assert!(model.apply(&UiIntent::ResetRegistrationForm, 0));
        assert_eq!(model.form, RegistrationForm::default());
    }

    #[test]
    fn test_render_objects_replaces_list() {
        let mut model = ViewModel::default();
        let entries = vec![ObjectEntry {
            label: "cup".to_string(),
            count: 2,
        }];
        model.apply(&UiIntent::RenderObjects { entries: entries.clone(), total: 2 }, 0);
        assert_eq!(model.objects, entries);
        model.apply(&UiIntent::RenderObjects { entries: Vec::new(), total: 0 }, 0);
        assert!(model.objects.is_empty());
        assert_eq!(model.total, 0);
    }

    fn terminal(json: bool) -> TerminalView {
        let options = TerminalOptions {
            json,
            no_color: true,
            open_links: false,
        };
        TerminalView::new(options, Url::parse("http://127.0.0.1:5000").unwrap())
    }

    #[test]
    fn test_resolve_redirect_targets() {
        let view = terminal(false);
        assert_eq!(
            view.resolve("/admin/face-records").unwrap().as_str(),
            "http://127.0.0.1:5000/admin/face-records"
        );
        assert_eq!(
            view.resolve("https://example.org/x").unwrap().as_str(),
            "https://example.org/x"
        );
    }

    #[test]
    fn test_navigate_intent_records_target() {
        let mut view = terminal(true);
        ViewBinder::apply(
            &mut view,
            Subsystem::Face,
            &[UiIntent::Navigate {
                url: "/admin/face-records".to_string(),
            }],
            0,
        );
        assert_eq!(view.model().navigated_to.as_deref(), Some("/admin/face-records"));
    }

    #[test]
    fn test_status_is_one_json_line() {
        let mut view = terminal(true);
        ViewBinder::apply(
            &mut view,
            Subsystem::Object,
            &[UiIntent::RenderObjects {
                entries: vec![ObjectEntry {
                    label: "cup".to_string(),
                    count: 2,
                }],
                total: 2,
            }],
            0,
        );
        let line = view.status_json().unwrap();
        assert!(!line.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["objects"][0]["label"], "cup");
    }
}
