// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The highlighting session.
//!
//! A [`Session`] owns every piece of mutable state: the style pair, the
//! pending rescan timer, the active view and the painted view. It is driven
//! by host events and timer expiry on a single thread, so no locking is
//! involved.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use serde_json::Value;

use crate::config::{ConfigKey, Settings};
use crate::decoration::{Debouncer, DecorationApplier, QUIET_INTERVAL, RefreshOutcome, StyleRegistry};
use crate::host::{DocumentId, Host, StatusSlot, ViewId};
use crate::markup::ScanMetrics;
use crate::profile::{self, MENU_TITLE, TagKind};
use crate::selection::{primary_selection_text, recount};

/// Label of the status button that opens the tag menu.
pub const TAG_MENU_LABEL: &str = "Tags";

/// User-invoked commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert (or wrap the selection with) a tag from the active profile
    InsertTag(TagKind),
    /// Switch between the `raw` and `normalized` profiles
    ToggleProfile,
    /// Show the tag quick menu
    ShowTagMenu,
}

/// Events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    DocumentChanged(DocumentId),
    ActiveViewChanged(Option<ViewId>),
    SelectionChanged(ViewId),
    /// Keys of the configuration section that changed
    ConfigurationChanged(Vec<ConfigKey>),
    Command(Command),
    Shutdown,
}

/// Controller for one host.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    styles: StyleRegistry,
    debouncer: Debouncer,
    applier: DecorationApplier,
    metrics: ScanMetrics,
    active_view: Option<ViewId>,
    running: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with the standard quiet interval.
    pub fn new() -> Self {
        Self::with_quiet_interval(QUIET_INTERVAL)
    }

    /// Creates a session that waits `quiet` after the last change before rescanning.
    pub fn with_quiet_interval(quiet: Duration) -> Self {
        Self {
            settings: Settings::default(),
            styles: StyleRegistry::new(),
            debouncer: Debouncer::new(quiet),
            applier: DecorationApplier::new(),
            metrics: ScanMetrics::default(),
            active_view: None,
            running: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.active_view
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_scan_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending rescan is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Receiver that yields when the pending rescan is due.
    pub fn timer(&self) -> &Receiver<Instant> {
        self.debouncer.timer()
    }

    /// Loads configuration, creates styles and status items, and schedules
    /// the first scan if a view is already focused.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H, now: Instant) {
        self.settings = load_settings(&*host);
        self.rebuild_styles(host);

        self.show_profile(host);
        host.show_status(StatusSlot::TagMenu, TAG_MENU_LABEL);

        self.active_view = host.active_view();
        self.refresh_char_count(host);
        self.running = true;

        if self.active_view.is_some() {
            self.schedule_scan(now);
        }
        tracing::debug!(active_view = ?self.active_view, "session started");
    }

    /// Handles one host event.
    ///
    /// Events arriving before `start` or after `stop` are dropped, so nothing
    /// the session creates can outlive it.
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: HostEvent, now: Instant) {
        if !self.running {
            tracing::trace!(?event, "session not running; event dropped");
            return;
        }
        tracing::trace!(?event, "host event");

        match event {
            HostEvent::DocumentChanged(document) => {
                if self.active_document(&*host) == Some(document) {
                    self.schedule_scan(now);
                }
            }
            HostEvent::ActiveViewChanged(view) => {
                self.active_view = view;
                self.refresh_char_count(host);
                self.schedule_scan(now);
            }
            HostEvent::SelectionChanged(_) => self.refresh_char_count(host),
            HostEvent::ConfigurationChanged(keys) => self.configuration_changed(host, &keys, now),
            HostEvent::Command(command) => self.run_command(host, command, now),
            HostEvent::Shutdown => self.stop(host),
        }
    }

    /// Runs the pending rescan if it is due. Returns whether one ran.
    pub fn poll<H: Host + ?Sized>(&mut self, host: &mut H, now: Instant) -> bool {
        if !self.running || !self.debouncer.take_due(now) {
            return false;
        }

        let outcome = self.applier.refresh(
            host,
            self.active_view,
            self.styles.current(),
            &mut self.metrics,
        );

        match outcome {
            RefreshOutcome::Painted {
                view,
                tags,
                variables,
                elapsed,
            } => {
                if elapsed > self.debouncer.quiet_interval() {
                    tracing::warn!(%view, ?elapsed, "scan took longer than the quiet interval");
                } else {
                    tracing::debug!(%view, tags, variables, ?elapsed, "decorations refreshed");
                }
            }
            RefreshOutcome::NoStyles => tracing::warn!("no decoration styles; skipping paint"),
            skipped => tracing::debug!(?skipped, "nothing to paint"),
        }
        true
    }

    /// Cancels the pending rescan and releases everything the session created.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.running {
            return;
        }

        self.debouncer.cancel();
        self.applier.clear(host, self.styles.current());
        self.styles.dispose(host);

        for slot in [StatusSlot::Profile, StatusSlot::TagMenu, StatusSlot::CharCount] {
            host.hide_status(slot);
        }
        self.running = false;
        tracing::debug!(scans = self.metrics.scans, "session stopped");
    }

    fn schedule_scan(&mut self, now: Instant) {
        let deadline = self.debouncer.notify_change(now);
        tracing::trace!(delay = ?deadline.saturating_duration_since(now), "rescan scheduled");
    }

    fn active_document<H: Host + ?Sized>(&self, host: &H) -> Option<DocumentId> {
        let view = self.active_view?;
        Some(host.view_document(view)?.id)
    }

    fn rebuild_styles<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Err(err) = self
            .styles
            .rebuild(host, &self.settings.tag_color, &self.settings.variable_color)
        {
            tracing::warn!(%err, "could not create decoration styles");
        }
    }

    fn show_profile<H: Host + ?Sized>(&self, host: &mut H) {
        host.show_status(StatusSlot::Profile, &format!("Profile: {}", self.settings.profile));
    }

    fn refresh_char_count<H: Host + ?Sized>(&self, host: &mut H) {
        let count = self
            .active_view
            .and_then(|view| primary_selection_text(&*host, view))
            .and_then(|text| recount(&text));

        match count {
            Some(count) => host.show_status(StatusSlot::CharCount, &count.to_string()),
            None => host.hide_status(StatusSlot::CharCount),
        }
    }

    fn configuration_changed<H: Host + ?Sized>(&mut self, host: &mut H, keys: &[ConfigKey], now: Instant) {
        self.settings = load_settings(&*host);

        if keys.iter().any(|key| key.affects_styles()) {
            self.rebuild_styles(host);
            self.schedule_scan(now);
        }
        if keys.contains(&ConfigKey::Profile) {
            self.show_profile(host);
        }
    }

    fn run_command<H: Host + ?Sized>(&mut self, host: &mut H, command: Command, now: Instant) {
        match command {
            Command::InsertTag(kind) => self.insert_tag(host, kind),
            Command::ToggleProfile => {
                let next = profile::toggled(&self.settings.profile);
                if let Err(err) = host.update_configuration(ConfigKey::Profile, Value::from(next)) {
                    tracing::warn!(%err, "could not switch profile");
                    return;
                }
                self.settings.profile = next.to_string();
                self.show_profile(host);
                self.schedule_scan(now);
            }
            Command::ShowTagMenu => {
                let Some(profile) = self.settings.active_profile() else {
                    return;
                };
                let items = profile::menu_items(profile);
                host.show_menu(MENU_TITLE, &items);
            }
        }
    }

    fn insert_tag<H: Host + ?Sized>(&self, host: &mut H, kind: TagKind) {
        let Some(view) = self.active_view else {
            return;
        };
        let Some(profile) = self.settings.active_profile() else {
            return;
        };
        let Some(text) = host
            .view_document(view)
            .and_then(|document| host.document_text(document.id))
        else {
            return;
        };

        let edits = profile::plan_insertion(profile, kind, &text, &host.selections(view));
        if edits.is_empty() {
            return;
        }
        if let Err(err) = host.apply_edits(view, &edits) {
            tracing::warn!(%err, ?kind, "tag insertion failed");
        }
    }
}

fn load_settings<H: Host + ?Sized>(host: &H) -> Settings {
    Settings::from_value(host.configuration()).unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to default settings");
        Settings::default()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::host::recording::RecordingHost;
    use crate::host::{Selection, TextEdit};
    use crate::markup::TextRange;

    const QUIET: Duration = Duration::from_millis(300);

    fn profiles_config() -> Value {
        json!({
            "profile": "raw",
            "profiles": {
                "raw": { "newline": "\\n", "colors": { "white": "[WHITE]", "red": "[RED]" } },
                "normalized": { "newline": "<br>", "colors": { "white": "~w~", "red": "~r~" } }
            }
        })
    }

    fn started(host: &mut RecordingHost, t0: Instant) -> Session {
        let mut session = Session::with_quiet_interval(QUIET);
        session.start(host, t0);
        session
    }

    fn tag_ranges(host: &RecordingHost, session: &Session, view: ViewId) -> Vec<TextRange> {
        let styles = session.styles.current().unwrap();
        host.ranges(view, styles.tag).to_vec()
    }

    #[test]
    fn test_start_creates_styles_and_status() {
        let mut host = RecordingHost::new();
        let session = started(&mut host, Instant::now());

        assert!(session.is_running());
        assert_eq!(host.live_styles.len(), 2);
        assert_eq!(host.status_text(StatusSlot::Profile), Some("Profile: raw"));
        assert_eq!(host.status_text(StatusSlot::TagMenu), Some("Tags"));
        assert_eq!(host.status_text(StatusSlot::CharCount), None);
        assert!(!session.is_scan_pending());
    }

    #[test]
    fn test_start_with_active_view_schedules_scan() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "ui.tsv", "[A] %s");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);

        assert_eq!(session.next_deadline(), Some(t0 + QUIET));
        assert!(!session.poll(&mut host, t0 + QUIET / 2));
        assert!(session.poll(&mut host, t0 + QUIET));
        assert_eq!(tag_ranges(&host, &session, view), vec![TextRange::new(0, 3)]);
    }

    #[test]
    fn test_burst_of_edits_scans_once_with_latest_text() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "ui.tsv", "");
        let document = host.document_of(view);
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);

        let mut now = t0;
        for i in 0..10 {
            now = t0 + Duration::from_millis(50 * i);
            host.set_text(view, &"[X]".repeat(i as usize + 1));
            session.handle_event(&mut host, HostEvent::DocumentChanged(document), now);
            assert!(!session.poll(&mut host, now));
        }

        assert!(!session.poll(&mut host, now + QUIET - Duration::from_millis(1)));
        assert!(session.poll(&mut host, now + QUIET));
        assert!(!session.poll(&mut host, now + QUIET * 3));

        assert_eq!(session.metrics().scans, 1);
        assert_eq!(tag_ranges(&host, &session, view).len(), 10);
    }

    #[test]
    fn test_text_read_at_fire_time() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "ui.tsv", "[OLD]");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);

        host.set_text(view, "x [NEW] [NEWER]");
        assert!(session.poll(&mut host, t0 + QUIET));
        assert_eq!(tag_ranges(&host, &session, view).len(), 2);
    }

    #[test]
    fn test_changes_to_inactive_documents_are_ignored() {
        let mut host = RecordingHost::new();
        let background = host.open(1, "other.tsv", "[A]");
        let background_doc = host.document_of(background);
        host.open(2, "ui.tsv", "[B]");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);
        assert!(session.poll(&mut host, t0 + QUIET));

        session.handle_event(&mut host, HostEvent::DocumentChanged(background_doc), t0 + QUIET);
        assert!(!session.is_scan_pending());
    }

    #[test]
    fn test_view_switch_is_checked_at_fire_time() {
        let mut host = RecordingHost::new();
        let first = host.open(1, "a.tsv", "[A]");
        let second = host.open(2, "b.tsv", "[B] [C]");
        host.active = Some(first);
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);

        // Switch before the first timer fires; the scan must land on the new view.
        let t1 = t0 + Duration::from_millis(100);
        session.handle_event(&mut host, HostEvent::ActiveViewChanged(Some(second)), t1);
        assert!(!session.poll(&mut host, t0 + QUIET));
        assert!(session.poll(&mut host, t1 + QUIET));

        assert!(tag_ranges(&host, &session, first).is_empty());
        assert_eq!(tag_ranges(&host, &session, second).len(), 2);
        assert_eq!(session.metrics().scans, 1);
    }

    #[test]
    fn test_losing_focus_clears_decorations() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "a.tsv", "[A]");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);
        assert!(session.poll(&mut host, t0 + QUIET));
        assert_eq!(tag_ranges(&host, &session, view).len(), 1);

        let t1 = t0 + QUIET * 2;
        session.handle_event(&mut host, HostEvent::ActiveViewChanged(None), t1);
        assert!(session.poll(&mut host, t1 + QUIET));
        assert!(tag_ranges(&host, &session, view).is_empty());
    }

    #[test]
    fn test_selection_counter() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "a.tsv", "[TAG]Hello");
        let mut session = started(&mut host, Instant::now());

        host.selections.insert(view, vec![Selection::new(0, 10)]);
        session.handle_event(&mut host, HostEvent::SelectionChanged(view), Instant::now());
        assert_eq!(
            host.status_text(StatusSlot::CharCount),
            Some("Visible: 5 (Total: 10)")
        );

        host.selections.insert(view, vec![Selection::caret(3)]);
        session.handle_event(&mut host, HostEvent::SelectionChanged(view), Instant::now());
        assert_eq!(host.status_text(StatusSlot::CharCount), None);
    }

    #[test]
    fn test_color_change_rebuilds_styles_and_rescans() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "a.tsv", "[A]");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);
        assert!(session.poll(&mut host, t0 + QUIET));
        let before = session.styles.current().unwrap();

        host.config = json!({ "tagColor": "#00ff00" });
        let t1 = t0 + QUIET * 2;
        session.handle_event(&mut host, HostEvent::ConfigurationChanged(vec![ConfigKey::TagColor]), t1);

        let after = session.styles.current().unwrap();
        assert_ne!(before, after);
        assert_eq!(host.live_styles.len(), 2);
        assert_eq!(host.live_styles[&after.tag].foreground, "#00ff00");
        assert!(host.disposed.contains(&before.tag));
        assert!(host.disposed.contains(&before.variable));

        assert!(session.is_scan_pending());
        assert!(session.poll(&mut host, t1 + QUIET));
        assert_eq!(host.ranges(view, after.tag).len(), 1);
    }

    #[test]
    fn test_profile_change_updates_status_without_rescan() {
        let mut host = RecordingHost::new();
        let mut session = started(&mut host, Instant::now());

        host.config = json!({ "profile": "normalized" });
        session.handle_event(
            &mut host,
            HostEvent::ConfigurationChanged(vec![ConfigKey::Profile]),
            Instant::now(),
        );

        assert_eq!(host.status_text(StatusSlot::Profile), Some("Profile: normalized"));
        assert_eq!(host.live_styles.len(), 2);
        assert_eq!(host.disposed.len(), 0);
        assert!(!session.is_scan_pending());
    }

    #[test]
    fn test_invalid_configuration_falls_back_to_defaults() {
        let mut host = RecordingHost::new();
        host.config = json!({ "tagColor": ["not", "a", "string"] });
        let session = started(&mut host, Instant::now());

        assert_eq!(session.settings(), &Settings::default());
        assert_eq!(host.live_styles.len(), 2);
    }

    #[test]
    fn test_insert_tag_command() {
        let mut host = RecordingHost::new();
        host.config = profiles_config();
        let view = host.open(1, "a.tsv", "hello world");
        host.selections.insert(view, vec![Selection::new(6, 11), Selection::caret(0)]);
        let mut session = started(&mut host, Instant::now());

        session.handle_event(&mut host, HostEvent::Command(Command::InsertTag(TagKind::Red)), Instant::now());

        assert_eq!(
            host.edits,
            vec![(
                view,
                vec![
                    TextEdit::replace(TextRange::new(6, 11), "[RED]world[WHITE]"),
                    TextEdit::insert(0, "[RED]"),
                ]
            )]
        );
    }

    #[test]
    fn test_commands_without_profile_do_nothing() {
        let mut host = RecordingHost::new();
        host.config = json!({ "profile": "missing", "profiles": {} });
        let view = host.open(1, "a.tsv", "hello");
        host.selections.insert(view, vec![Selection::caret(0)]);
        let mut session = started(&mut host, Instant::now());

        session.handle_event(&mut host, HostEvent::Command(Command::InsertTag(TagKind::Newline)), Instant::now());
        session.handle_event(&mut host, HostEvent::Command(Command::ShowTagMenu), Instant::now());

        assert!(host.edits.is_empty());
        assert!(host.menus.is_empty());
    }

    #[test]
    fn test_show_tag_menu() {
        let mut host = RecordingHost::new();
        host.config = profiles_config();
        let mut session = started(&mut host, Instant::now());

        session.handle_event(&mut host, HostEvent::Command(Command::ShowTagMenu), Instant::now());

        let (title, items) = &host.menus[0];
        assert_eq!(title, MENU_TITLE);
        let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["Newline", "White", "Red"]);
    }

    #[test]
    fn test_toggle_profile() {
        let mut host = RecordingHost::new();
        host.config = profiles_config();
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);

        session.handle_event(&mut host, HostEvent::Command(Command::ToggleProfile), t0);
        assert_eq!(host.config_writes, vec![(ConfigKey::Profile, json!("normalized"))]);
        assert_eq!(session.settings().profile, "normalized");
        assert_eq!(host.status_text(StatusSlot::Profile), Some("Profile: normalized"));
        assert!(session.is_scan_pending());

        session.handle_event(&mut host, HostEvent::Command(Command::ToggleProfile), t0);
        assert_eq!(session.settings().profile, "raw");
        assert_eq!(host.config["profile"], json!("raw"));
    }

    #[test]
    fn test_stop_releases_everything() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "a.tsv", "[A]");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);
        assert!(session.poll(&mut host, t0 + QUIET));

        let document = host.document_of(view);
        session.handle_event(&mut host, HostEvent::DocumentChanged(document), t0 + QUIET);
        session.handle_event(&mut host, HostEvent::Shutdown, t0 + QUIET);

        assert!(!session.is_running());
        assert!(!session.is_scan_pending());
        assert!(host.live_styles.is_empty());
        assert!(host.painted.is_empty());
        assert!(host.status.is_empty());

        // Stopping twice is harmless.
        session.stop(&mut host);
        assert_eq!(host.disposed.len(), 2);
    }

    #[test]
    fn test_events_after_shutdown_are_dropped() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "a.tsv", "[A]");
        let t0 = Instant::now();
        let mut session = started(&mut host, t0);
        session.handle_event(&mut host, HostEvent::Shutdown, t0);
        assert!(host.live_styles.is_empty());

        host.config = json!({ "tagColor": "#00ff00" });
        session.handle_event(&mut host, HostEvent::ConfigurationChanged(vec![ConfigKey::TagColor]), t0);
        session.handle_event(&mut host, HostEvent::ActiveViewChanged(Some(view)), t0);
        session.handle_event(&mut host, HostEvent::Command(Command::ToggleProfile), t0);

        assert!(!session.is_scan_pending());
        assert!(!session.poll(&mut host, t0 + QUIET));
        assert!(host.live_styles.is_empty());
        assert!(host.painted.is_empty());
        assert!(host.status.is_empty());
        assert!(host.config_writes.is_empty());
        assert_eq!(session.metrics().scans, 0);
    }

    #[test]
    fn test_events_before_start_are_dropped() {
        let mut host = RecordingHost::new();
        let view = host.open(1, "a.tsv", "[A]");
        let t0 = Instant::now();
        let mut session = Session::with_quiet_interval(QUIET);

        session.handle_event(&mut host, HostEvent::ActiveViewChanged(Some(view)), t0);
        assert!(!session.is_scan_pending());
        assert!(!session.poll(&mut host, t0 + QUIET));
        assert!(host.live_styles.is_empty());
    }
}
