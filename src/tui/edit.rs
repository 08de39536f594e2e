//! The `keys edit` screen: rename a key and/or change its value.

use tracing::debug;

use super::events::Input;
use super::session::{Outcome, Services};
use crate::models::Entry;
use crate::store::KeyStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Value,
}

impl EditField {
    fn other(self) -> Self {
        match self {
            EditField::Name => EditField::Value,
            EditField::Value => EditField::Name,
        }
    }
}

pub struct EditSession {
    original_name: String,
    name: String,
    value: String,
    focus: EditField,
    profile: String,
    outcome: Option<Outcome>,
}

impl EditSession {
    /// Seed both fields from `entry`, with the name focused.
    pub fn new(entry: &Entry, profile: impl Into<String>) -> Self {
        Self {
            original_name: entry.name.clone(),
            name: entry.name.clone(),
            value: entry.value.clone(),
            focus: EditField::Name,
            profile: profile.into(),
            outcome: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn focus(&self) -> EditField {
        self.focus
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

    pub fn handle(&mut self, input: Input, services: &mut Services<'_>) {
        if self.is_terminal() {
            return;
        }

        match input {
            Input::Esc | Input::Ctrl('c') => self.finish(Outcome::Cancelled),
            Input::Tab | Input::BackTab => self.focus = self.focus.other(),
            Input::Enter => self.save(&mut *services.store),
            Input::Backspace => {
                self.focused_mut().pop();
            }
            Input::Char(c) => self.focused_mut().push(c),
            _ => {}
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            EditField::Name => &mut self.name,
            EditField::Value => &mut self.value,
        }
    }

    fn save(&mut self, store: &mut dyn KeyStore) {
        if self.name.is_empty() || self.value.is_empty() {
            return;
        }

        let message =
            match store.rename_and_update(&self.profile, &self.original_name, &self.name, &self.value)
            {
                Ok(()) => format!("Updated {}", self.name),
                Err(e) => format!("Error: {}", e),
            };
        self.finish(Outcome::Saved(message));
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!(outcome = outcome.kind(), "edit finished");
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;
    use crate::clipboard::ClipboardProvider;
    use crate::store::{StoreError, StoreResult};

    #[derive(Default)]
    struct FakeStore {
        renames: Vec<(String, String, String, String)>,
        missing: bool,
    }

    impl KeyStore for FakeStore {
        fn upsert(&mut self, _: &str, _: &str, _: &str) -> StoreResult<()> {
            Ok(())
        }

        fn rename_and_update(
            &mut self,
            profile: &str,
            old_name: &str,
            new_name: &str,
            value: &str,
        ) -> StoreResult<()> {
            if self.missing {
                return Err(StoreError::NotFound(old_name.to_string()));
            }
            self.renames.push((
                profile.to_string(),
                old_name.to_string(),
                new_name.to_string(),
                value.to_string(),
            ));
            Ok(())
        }

        fn list(&self, _: &str) -> StoreResult<Vec<Entry>> {
            Ok(Vec::new())
        }

        fn exists(&self, _: &str, _: &str) -> StoreResult<bool> {
            Ok(true)
        }
    }

    struct NoClipboard;

    impl ClipboardProvider for NoClipboard {
        fn set_text(&mut self, _text: &str) -> Result<()> {
            anyhow::bail!("unused")
        }
    }

    fn run(session: &mut EditSession, store: &mut FakeStore, inputs: &[Input]) {
        let mut clipboard = NoClipboard;
        let mut services = Services { store, clipboard: &mut clipboard };
        for input in inputs {
            session.handle(*input, &mut services);
        }
    }

    fn seeded() -> EditSession {
        EditSession::new(&Entry::new("OLD", "v1", 0), "default")
    }

    #[test]
    fn test_seeded_from_entry() {
        let session = seeded();
        assert_eq!(session.name(), "OLD");
        assert_eq!(session.value(), "v1");
        assert_eq!(session.focus(), EditField::Name);
    }

    #[test]
    fn test_tab_toggles_focus() {
        let mut session = seeded();
        let mut store = FakeStore::default();

        run(&mut session, &mut store, &[Input::Tab]);
        assert_eq!(session.focus(), EditField::Value);

        run(&mut session, &mut store, &[Input::BackTab]);
        assert_eq!(session.focus(), EditField::Name);
    }

    #[test]
    fn test_rename_and_update() {
        let mut session = seeded();
        let mut store = FakeStore::default();

        let inputs = [
            Input::Backspace,
            Input::Backspace,
            Input::Backspace,
            Input::Char('N'),
            Input::Tab,
            Input::Char('2'),
            Input::Enter,
        ];
        run(&mut session, &mut store, &inputs);

        assert_eq!(session.outcome(), Some(&Outcome::Saved("Updated N".to_string())));
        assert_eq!(
            store.renames,
            vec![(
                "default".to_string(),
                "OLD".to_string(),
                "N".to_string(),
                "v12".to_string()
            )]
        );
    }

    #[test]
    fn test_empty_field_blocks_save() {
        let mut session = seeded();
        let mut store = FakeStore::default();

        run(&mut session, &mut store, &[Input::Tab, Input::Backspace, Input::Backspace, Input::Enter]);

        assert!(!session.is_terminal());
        assert!(store.renames.is_empty());
    }

    #[test]
    fn test_cancel_discards_edits() {
        let mut session = seeded();
        let mut store = FakeStore::default();

        run(&mut session, &mut store, &[Input::Char('X'), Input::Esc, Input::Enter]);

        assert_eq!(session.into_outcome(), Some(Outcome::Cancelled));
        assert!(store.renames.is_empty());
    }

    #[test]
    fn test_store_error_is_reported() {
        let mut session = seeded();
        let mut store = FakeStore { missing: true, ..Default::default() };

        run(&mut session, &mut store, &[Input::Enter]);

        assert_eq!(
            session.outcome(),
            Some(&Outcome::Saved("Error: key \"OLD\" not found".to_string()))
        );
    }
}
