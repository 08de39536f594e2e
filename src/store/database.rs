//! SQLite-backed key store.
//!
//! A single `keys` table keyed by `(profile, name)`. Databases written by
//! older releases (no timestamps, no profiles) are migrated in place every
//! time the file is opened, so the schema is always current before the first
//! query runs.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::debug;

use super::KeyStore;
use super::error::{StoreError, StoreResult};
use crate::models::Entry;
use crate::utils::ensure_private_dir;

const DB_FILENAME: &str = "keys.db";

const UPSERT_SQL: &str = "INSERT INTO keys (profile, name, value, updated_at) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(profile, name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// Get path to the database file inside the keys directory
pub fn get_db_path(keys_dir: &Path) -> PathBuf {
    keys_dir.join(DB_FILENAME)
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry { name: row.get(0)?, value: row.get(1)?, updated_at: row.get(2)? })
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            ensure_private_dir(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened key database");

        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open a throwaway database, used by tests and benchmarks.
    pub fn open_in_memory() -> StoreResult<Self> {
        let mut db = Self { conn: Connection::open_in_memory()? };
        db.migrate()?;
        Ok(db)
    }

    fn column_exists(&self, table: &str, column: &str) -> StoreResult<bool> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let columns =
            stmt.query_map([], |row| row.get::<_, String>(1))?.collect::<Result<Vec<_>, _>>()?;
        Ok(columns.iter().any(|name| name == column))
    }

    fn migrate(&mut self) -> StoreResult<()> {
        // Original single-profile schema; every later step builds on it.
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS keys (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;

        let now = Utc::now().timestamp();

        if !self.column_exists("keys", "updated_at")? {
            debug!("migrating keys table: adding updated_at");
            self.conn.execute("ALTER TABLE keys ADD COLUMN updated_at INTEGER", [])?;
            self.conn
                .execute("UPDATE keys SET updated_at = ?1 WHERE updated_at IS NULL", params![now])?;
        }

        if !self.column_exists("keys", "profile")? {
            debug!("migrating keys table: adding profile to the primary key");
            let tx = self.conn.transaction()?;
            tx.execute_batch(
                "ALTER TABLE keys RENAME TO keys_old;
                 CREATE TABLE keys (
                     profile TEXT NOT NULL DEFAULT 'default',
                     name TEXT NOT NULL,
                     value TEXT NOT NULL,
                     updated_at INTEGER,
                     PRIMARY KEY (profile, name)
                 );",
            )?;
            tx.execute(
                "INSERT INTO keys (profile, name, value, updated_at)
                 SELECT 'default', name, value, COALESCE(updated_at, ?1) FROM keys_old",
                params![now],
            )?;
            tx.execute_batch("DROP TABLE keys_old")?;
            tx.commit()?;
        }

        Ok(())
    }

    /// Fetch a single key, failing with [`StoreError::NotFound`] if absent.
    pub fn get(&self, profile: &str, name: &str) -> StoreResult<Entry> {
        self.conn
            .query_row(
                "SELECT name, value, COALESCE(updated_at, 0) FROM keys WHERE profile = ?1 AND name = ?2",
                params![profile, name],
                entry_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Fetch the named keys that exist, ordered by name. Unknown names are skipped.
    pub fn get_many(&self, profile: &str, names: &[String]) -> StoreResult<Vec<Entry>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(",");
        let sql = format!(
            "SELECT name, value, COALESCE(updated_at, 0) FROM keys
             WHERE profile = ? AND name IN ({placeholders}) ORDER BY name"
        );
        let args = std::iter::once(profile).chain(names.iter().map(String::as_str));

        let mut stmt = self.conn.prepare(&sql)?;
        let entries =
            stmt.query_map(params_from_iter(args), entry_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Delete one key, failing with [`StoreError::NotFound`] if nothing was removed.
    pub fn delete(&mut self, profile: &str, name: &str) -> StoreResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM keys WHERE profile = ?1 AND name = ?2", params![profile, name])?;
        if removed == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        debug!(profile, name, "deleted key");
        Ok(())
    }

    /// Delete every key in `profile`, returning how many were removed.
    pub fn nuke(&mut self, profile: &str) -> StoreResult<usize> {
        let removed = self.conn.execute("DELETE FROM keys WHERE profile = ?1", params![profile])?;
        debug!(profile, removed, "nuked profile");
        Ok(removed)
    }

    /// All profiles that currently hold at least one key, sorted.
    pub fn list_profiles(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT profile FROM keys ORDER BY profile")?;
        let profiles =
            stmt.query_map([], |row| row.get::<_, String>(0))?.collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }
}

impl KeyStore for Database {
    fn upsert(&mut self, profile: &str, name: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now().timestamp();
        self.conn.execute(UPSERT_SQL, params![profile, name, value, now])?;
        debug!(profile, name, "stored key");
        Ok(())
    }

    fn rename_and_update(
        &mut self,
        profile: &str,
        old_name: &str,
        new_name: &str,
        value: &str,
    ) -> StoreResult<()> {
        let now = Utc::now().timestamp();
        let tx = self.conn.transaction()?;

        let removed = tx.execute(
            "DELETE FROM keys WHERE profile = ?1 AND name = ?2",
            params![profile, old_name],
        )?;
        if removed == 0 {
            // Dropping the transaction rolls it back.
            return Err(StoreError::NotFound(old_name.to_string()));
        }
        tx.execute(UPSERT_SQL, params![profile, new_name, value, now])?;
        tx.commit()?;

        debug!(profile, old_name, new_name, "updated key");
        Ok(())
    }

    fn list(&self, profile: &str) -> StoreResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, value, COALESCE(updated_at, 0) FROM keys WHERE profile = ?1 ORDER BY name",
        )?;
        let entries =
            stmt.query_map(params![profile], entry_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn exists(&self, profile: &str, name: &str) -> StoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM keys WHERE profile = ?1 AND name = ?2",
            params![profile, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
