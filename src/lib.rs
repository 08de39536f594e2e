//! keys - store, search and export API keys locally
//!
//! Keys live in a SQLite database under `~/.keys`, partitioned into profiles.
//! The interesting part is the interactive layer in [`tui`]: small, replayable
//! state machines for incremental search, multi-select, masked values, inline
//! add and edit forms, and clipboard / `.env` export.
//!
//! # Example
//!
//! ```
//! use keys::store::Database;
//! use keys::tui::{Input, Mode, Outcome, Services, Session, replay};
//! use keys::clipboard::SystemClipboard;
//!
//! let mut store = Database::open_in_memory()?;
//! let mut clipboard = SystemClipboard::new();
//! let mut services = Services { store: &mut store, clipboard: &mut clipboard };
//!
//! let mut session = Session::new(Vec::new(), "default", Mode::search());
//! let inputs = "NEW".chars().map(Input::Char).chain([Input::Enter, Input::Enter])
//!     .chain("val".chars().map(Input::Char)).chain([Input::Enter]);
//! replay(&mut session, inputs, &mut services);
//!
//! assert_eq!(session.outcome(), Some(&Outcome::Saved("Added NEW".to_string())));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod dotenv;
pub mod logging;
pub mod models;
pub mod store;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use models::Entry;
pub use store::{Database, KeyStore, StoreError};
pub use tui::filtered_view;
pub use utils::format_path_with_tilde;
