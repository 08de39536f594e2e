//! Persistence for keys, profiles and the unlock session.
//!
//! - [`database`] - the SQLite key table and its lazy schema migration
//! - [`profile`] - the active profile, kept in `~/.keys/config`
//! - [`auth`] - the session gate checked once before any command touches keys

pub mod auth;
pub mod database;
pub mod error;
pub mod profile;

pub use auth::{BiometricVerifier, NoBiometrics, SessionGate, Verification};
pub use database::{Database, get_db_path};
pub use error::{StoreError, StoreResult};
pub use profile::{DEFAULT_PROFILE, get_active_profile, set_active_profile};

use crate::models::Entry;

/// The persistence operations an interactive session depends on.
///
/// Implemented by [`Database`]; tests substitute an in-memory fake.
pub trait KeyStore {
    /// Insert a key or overwrite its value, refreshing its timestamp.
    fn upsert(&mut self, profile: &str, name: &str, value: &str) -> StoreResult<()>;

    /// Replace `old_name` with `new_name`/`value` atomically: either the whole
    /// change lands or nothing does.
    fn rename_and_update(
        &mut self,
        profile: &str,
        old_name: &str,
        new_name: &str,
        value: &str,
    ) -> StoreResult<()>;

    /// All keys in `profile`, sorted by name.
    fn list(&self, profile: &str) -> StoreResult<Vec<Entry>>;

    fn exists(&self, profile: &str, name: &str) -> StoreResult<bool>;
}
