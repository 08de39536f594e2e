//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use keys::clipboard::ClipboardProvider;
use keys::models::Entry;
use keys::store::{Database, KeyStore, StoreError, StoreResult, get_db_path, set_active_profile};
use tempfile::TempDir;

/// Builder for a temporary `$HOME` with a populated `~/.keys` directory
pub struct KeysHomeBuilder {
    temp_dir: TempDir,
    profile: Option<String>,
    keys: Vec<(String, String, String)>,
}

impl KeysHomeBuilder {
    /// Create a new builder with an empty home directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, profile: None, keys: Vec::new() }
    }

    /// Store `name`/`value` in `profile` when built
    pub fn with_key(mut self, profile: &str, name: &str, value: &str) -> Self {
        self.keys.push((profile.to_string(), name.to_string(), value.to_string()));
        self
    }

    /// Make `profile` the active profile
    pub fn with_active_profile(mut self, profile: &str) -> Self {
        self.profile = Some(profile.to_string());
        self
    }

    /// Write the database and config, returning the home directory
    pub fn build(self) -> TempDir {
        let keys_dir = self.temp_dir.path().join(".keys");
        let mut db = Database::open(&get_db_path(&keys_dir)).expect("Failed to open database");
        for (profile, name, value) in &self.keys {
            db.upsert(profile, name, value).expect("Failed to seed key");
        }
        if let Some(profile) = &self.profile {
            set_active_profile(&keys_dir, profile).expect("Failed to set profile");
        }
        self.temp_dir
    }
}

impl Default for KeysHomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn keys_dir(home: &Path) -> PathBuf {
    home.join(".keys")
}

/// Open the database inside a home created by [`KeysHomeBuilder`]
pub fn open_db(home: &Path) -> Database {
    Database::open(&get_db_path(&keys_dir(home))).expect("Failed to open database")
}

/// In-memory key store that records every write
#[derive(Default)]
pub struct MemoryStore {
    pub entries: Vec<(String, Entry)>,
    pub upserts: Vec<(String, String, String)>,
    pub renames: Vec<(String, String, String, String)>,
    pub fail_with: Option<String>,
}

impl MemoryStore {
    pub fn failing(message: &str) -> Self {
        Self { fail_with: Some(message.to_string()), ..Default::default() }
    }

    fn check(&self) -> StoreResult<()> {
        match &self.fail_with {
            Some(message) => Err(StoreError::Io(std::io::Error::other(message.clone()))),
            None => Ok(()),
        }
    }
}

impl KeyStore for MemoryStore {
    fn upsert(&mut self, profile: &str, name: &str, value: &str) -> StoreResult<()> {
        self.check()?;
        self.upserts.push((profile.to_string(), name.to_string(), value.to_string()));
        self.entries.retain(|(p, e)| !(p == profile && e.name == name));
        self.entries.push((profile.to_string(), Entry::new(name, value, 1)));
        Ok(())
    }

    fn rename_and_update(
        &mut self,
        profile: &str,
        old_name: &str,
        new_name: &str,
        value: &str,
    ) -> StoreResult<()> {
        self.check()?;
        if !self.exists(profile, old_name)? {
            return Err(StoreError::NotFound(old_name.to_string()));
        }
        self.renames.push((
            profile.to_string(),
            old_name.to_string(),
            new_name.to_string(),
            value.to_string(),
        ));
        self.entries.retain(|(p, e)| !(p == profile && e.name == old_name));
        self.entries.push((profile.to_string(), Entry::new(new_name, value, 1)));
        Ok(())
    }

    fn list(&self, profile: &str) -> StoreResult<Vec<Entry>> {
        let mut entries: Vec<Entry> =
            self.entries.iter().filter(|(p, _)| p == profile).map(|(_, e)| e.clone()).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, profile: &str, name: &str) -> StoreResult<bool> {
        Ok(self.entries.iter().any(|(p, e)| p == profile && e.name == name))
    }
}

/// Clipboard that keeps everything it is given
#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Vec<String>,
}

impl ClipboardProvider for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.copied.push(text.to_string());
        Ok(())
    }
}

/// Clipboard that always fails, like a headless session
pub struct FailingClipboard;

impl ClipboardProvider for FailingClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        anyhow::bail!("clipboard unavailable")
    }
}

/// Entries `A=1`, `B=2`, `C=3` with no timestamp
pub fn abc() -> Vec<Entry> {
    vec![Entry::new("A", "1", 0), Entry::new("B", "2", 0), Entry::new("C", "3", 0)]
}
