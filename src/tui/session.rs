//! The interactive list session shared by `see`, `peek`, `get` and `env`.
//!
//! One [`Session`] type drives all four screens; a [`Mode`] decides which
//! gestures are live. Every input is a deterministic transition over the
//! session state:
//!
//! - **Filter**: the visible list is recomputed from `search_text` on demand
//! - **Cursor**: an index into the visible list, reset on every search edit
//! - **Selection / reveal**: sets of entry names, so they survive filtering
//! - **Add flow**: a two-phase name/value prompt entered from an empty search
//! - **Dispatch**: copy and export actions over the effective target set
//!
//! Once an [`Outcome`] is recorded the session is terminal and ignores input.

use std::collections::HashSet;

use tracing::debug;

use super::dispatch::{CopyFormat, Flash, copy_targets, effective_targets};
use super::events::Input;
use super::filter::filtered_view;
use crate::clipboard::ClipboardProvider;
use crate::models::Entry;
use crate::store::KeyStore;

/// Collaborators reached from inside a transition.
pub struct Services<'a> {
    pub store: &'a mut dyn KeyStore,
    pub clipboard: &'a mut dyn ClipboardProvider,
}

/// Which gestures a session accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    /// Values are drawn as `***` until revealed; `r` toggles reveal.
    pub masked: bool,
    /// Printable keys edit the search text. Without search, `j`/`k`/`q`/`a`
    /// act as commands instead.
    pub search_enabled: bool,
    /// Entries carry a checkbox toggled with space.
    pub multi_select: bool,
    /// Enter on an empty result offers to add the searched name.
    pub add_flow_enabled: bool,
    /// Copy and `.env` export gestures; rows show values and age.
    pub clipboard_actions: bool,
}

impl Mode {
    /// `keys see`
    pub fn search() -> Self {
        Self {
            masked: false,
            search_enabled: true,
            multi_select: true,
            add_flow_enabled: true,
            clipboard_actions: true,
        }
    }

    /// `keys peek`
    pub fn peek() -> Self {
        Self { masked: true, ..Self::search() }
    }

    /// `keys get` without a name
    pub fn picker() -> Self {
        Self {
            masked: false,
            search_enabled: true,
            multi_select: false,
            add_flow_enabled: false,
            clipboard_actions: false,
        }
    }

    /// `keys env`
    pub fn selector() -> Self {
        Self {
            masked: false,
            search_enabled: false,
            multi_select: true,
            add_flow_enabled: false,
            clipboard_actions: false,
        }
    }
}

/// What free text currently edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Searching,
    EnteringNewName,
    EnteringNewValue,
}

/// Final disposition of a session, consumed by the command that ran it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Closed without doing anything.
    Cancelled,
    /// A write was attempted; the message says whether it succeeded.
    Saved(String),
    /// The host should write these entries to a `.env` file.
    ExportRequested(Vec<Entry>),
    Picked(Entry),
    /// A picker or selector was closed without choosing.
    Aborted,
}

impl Outcome {
    /// Short name for logs. Never includes values.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Cancelled => "cancelled",
            Outcome::Saved(_) => "saved",
            Outcome::ExportRequested(_) => "export_requested",
            Outcome::Picked(_) => "picked",
            Outcome::Aborted => "aborted",
        }
    }
}

pub struct Session {
    entries: Vec<Entry>,
    profile: String,
    mode: Mode,
    search_text: String,
    cursor: usize,
    selected: HashSet<String>,
    revealed: HashSet<String>,
    phase: Phase,
    pending_name: String,
    pending_value: String,
    flash: Option<Flash>,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(entries: Vec<Entry>, profile: impl Into<String>, mode: Mode) -> Self {
        Self {
            entries,
            profile: profile.into(),
            mode,
            search_text: String::new(),
            cursor: 0,
            selected: HashSet::new(),
            revealed: HashSet::new(),
            phase: Phase::Searching,
            pending_name: String::new(),
            pending_value: String::new(),
            flash: None,
            outcome: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_name(&self) -> &str {
        &self.pending_name
    }

    pub fn pending_value(&self) -> &str {
        &self.pending_value
    }

    pub fn flash(&self) -> Option<Flash> {
        self.flash
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn is_revealed(&self, name: &str) -> bool {
        self.revealed.contains(name)
    }

    /// The entries matching the current search text.
    pub fn view(&self) -> Vec<&Entry> {
        filtered_view(&self.entries, &self.search_text)
    }

    /// Checked entries that are currently visible.
    pub fn selected_count(&self) -> usize {
        self.view().iter().filter(|entry| self.selected.contains(&entry.name)).count()
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        self.outcome
    }

    /// Apply one input. Inputs arriving after the session ended are ignored.
    pub fn handle(&mut self, input: Input, services: &mut Services<'_>) {
        if self.is_terminal() {
            return;
        }

        match self.phase {
            Phase::Searching => self.handle_search(input, services),
            Phase::EnteringNewName | Phase::EnteringNewValue => {
                self.handle_add(input, &mut *services.store)
            }
        }
    }

    fn handle_search(&mut self, input: Input, services: &mut Services<'_>) {
        let mode = self.mode;
        match input {
            Input::Esc | Input::Ctrl('c') => self.quit(),
            Input::Char('q') if !mode.search_enabled => self.quit(),

            Input::Up => self.move_up(),
            Input::Char('k') if !mode.search_enabled => self.move_up(),
            Input::Down => self.move_down(),
            Input::Char('j') if !mode.search_enabled => self.move_down(),

            // Command keys that would otherwise be typed into the search box
            Input::Char(' ') if mode.multi_select => self.toggle_selected(),
            Input::Char('r') if mode.masked => self.toggle_revealed(),
            Input::Char('a') if !mode.search_enabled && mode.multi_select => self.toggle_all(),

            Input::Tab if mode.clipboard_actions => self.copy(CopyFormat::Env, services.clipboard),
            Input::BackTab | Input::Ctrl('y') if mode.clipboard_actions => {
                self.copy(CopyFormat::Export, services.clipboard)
            }
            Input::Ctrl('e') if mode.clipboard_actions => self.request_export(),

            Input::Enter => self.commit(),

            Input::Backspace if mode.search_enabled => self.pop_search(),
            Input::Char(c) if mode.search_enabled => self.push_search(c),

            _ => {}
        }
    }

    fn handle_add(&mut self, input: Input, store: &mut dyn KeyStore) {
        match input {
            Input::Esc | Input::Ctrl('c') => self.quit(),
            Input::Enter => self.advance_add(store),
            Input::Backspace => {
                self.pending_field_mut().pop();
            }
            Input::Char(c) => self.pending_field_mut().push(c),
            _ => {}
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!(outcome = outcome.kind(), "session finished");
        self.outcome = Some(outcome);
    }

    fn quit(&mut self) {
        let outcome = if self.mode.add_flow_enabled { Outcome::Cancelled } else { Outcome::Aborted };
        self.finish(outcome);
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.flash = None;
        }
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.view().len() {
            self.cursor += 1;
            self.flash = None;
        }
    }

    fn push_search(&mut self, c: char) {
        self.search_text.push(c);
        self.cursor = 0;
        self.flash = None;
    }

    fn pop_search(&mut self) {
        if self.search_text.pop().is_some() {
            self.cursor = 0;
            self.flash = None;
        }
    }

    fn cursor_name(&self) -> Option<String> {
        self.view().get(self.cursor).map(|entry| entry.name.clone())
    }

    fn toggle_selected(&mut self) {
        let Some(name) = self.cursor_name() else {
            return;
        };
        if !self.selected.remove(&name) {
            self.selected.insert(name);
        }
        self.flash = None;
    }

    fn toggle_revealed(&mut self) {
        let Some(name) = self.cursor_name() else {
            return;
        };
        if !self.revealed.remove(&name) {
            self.revealed.insert(name);
        }
    }

    /// Clear when every visible entry is checked, otherwise check them all.
    /// A partial selection is completed rather than cleared.
    fn toggle_all(&mut self) {
        let names: Vec<String> = self.view().iter().map(|entry| entry.name.clone()).collect();
        if names.iter().all(|name| self.selected.contains(name)) {
            for name in &names {
                self.selected.remove(name);
            }
        } else {
            self.selected.extend(names);
        }
    }

    fn copy(&mut self, format: CopyFormat, clipboard: &mut dyn ClipboardProvider) {
        let view = filtered_view(&self.entries, &self.search_text);
        let targets = effective_targets(&view, &self.selected, self.cursor);
        if targets.is_empty() {
            return;
        }
        self.flash = copy_targets(&targets, format, clipboard);
    }

    fn request_export(&mut self) {
        let view = filtered_view(&self.entries, &self.search_text);
        let targets: Vec<Entry> = effective_targets(&view, &self.selected, self.cursor)
            .into_iter()
            .cloned()
            .collect();
        if !targets.is_empty() {
            self.finish(Outcome::ExportRequested(targets));
        }
    }

    fn commit(&mut self) {
        if self.mode.add_flow_enabled {
            if self.view().is_empty() && !self.search_text.is_empty() {
                self.pending_name = self.search_text.clone();
                self.phase = Phase::EnteringNewName;
            }
        } else if self.mode.multi_select {
            let checked: Vec<Entry> = self
                .entries
                .iter()
                .filter(|entry| self.selected.contains(&entry.name))
                .cloned()
                .collect();
            self.finish(Outcome::ExportRequested(checked));
        } else {
            let picked = self.view().get(self.cursor).map(|entry| (*entry).clone());
            if let Some(entry) = picked {
                self.finish(Outcome::Picked(entry));
            }
        }
    }

    fn pending_field_mut(&mut self) -> &mut String {
        match self.phase {
            Phase::EnteringNewValue => &mut self.pending_value,
            _ => &mut self.pending_name,
        }
    }

    fn advance_add(&mut self, store: &mut dyn KeyStore) {
        match self.phase {
            Phase::EnteringNewName if !self.pending_name.is_empty() => {
                self.phase = Phase::EnteringNewValue;
            }
            Phase::EnteringNewValue
                if !self.pending_name.is_empty() && !self.pending_value.is_empty() =>
            {
                let message =
                    match store.upsert(&self.profile, &self.pending_name, &self.pending_value) {
                        Ok(()) => format!("Added {}", self.pending_name),
                        Err(e) => format!("Error: {}", e),
                    };
                self.finish(Outcome::Saved(message));
            }
            _ => {}
        }
    }
}
