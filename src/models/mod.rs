//! Data models shared by the store, the CLI and the interactive sessions.
//!
//! - [`Entry`] - a named key/value pair with its last-updated timestamp

pub mod entry;

pub use entry::Entry;
