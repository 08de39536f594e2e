//! Actions that operate on the effective target set of a session.

use std::collections::HashSet;

use tracing::debug;

use crate::clipboard::{ClipboardProvider, copy_with_provider};
use crate::models::Entry;

/// How entries are rendered when copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFormat {
    /// `export NAME=VALUE`
    Export,
    /// `NAME=VALUE`
    Env,
}

impl CopyFormat {
    pub fn tag(self) -> &'static str {
        match self {
            CopyFormat::Export => "export",
            CopyFormat::Env => "env",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CopyFormat::Export => "export",
            CopyFormat::Env => "KEY=VAL",
        }
    }

    pub fn format_entry(self, entry: &Entry) -> String {
        match self {
            CopyFormat::Export => entry.as_export(),
            CopyFormat::Env => entry.as_assignment(),
        }
    }
}

/// Transient confirmation of the last copy, cleared by the next navigation or
/// search edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub format: CopyFormat,
    pub count: usize,
}

impl Flash {
    pub fn message(&self) -> String {
        let noun = if self.count == 1 { "key" } else { "keys" };
        format!("Copied {} {} as {}", self.count, noun, self.format.label())
    }
}

/// The entries an action applies to.
///
/// Checked entries that are visible in `view` win, in view order; with none
/// checked the entry under the cursor is used; an empty view yields nothing.
pub fn effective_targets<'a>(
    view: &[&'a Entry],
    selected: &HashSet<String>,
    cursor: usize,
) -> Vec<&'a Entry> {
    let checked: Vec<&Entry> =
        view.iter().copied().filter(|entry| selected.contains(&entry.name)).collect();
    if !checked.is_empty() {
        return checked;
    }
    view.get(cursor).copied().into_iter().collect()
}

pub fn format_targets(targets: &[&Entry], format: CopyFormat) -> String {
    targets.iter().map(|entry| format.format_entry(entry)).collect::<Vec<_>>().join("\n")
}

/// Copy `targets` and describe the result.
///
/// Clipboard failures are logged at debug level and yield `None`.
pub fn copy_targets(
    targets: &[&Entry],
    format: CopyFormat,
    clipboard: &mut dyn ClipboardProvider,
) -> Option<Flash> {
    if targets.is_empty() {
        return None;
    }

    match copy_with_provider(&format_targets(targets, format), clipboard) {
        Ok(()) => Some(Flash { format, count: targets.len() }),
        Err(e) => {
            debug!(error = %e, format = format.tag(), "clipboard copy failed");
            None
        }
    }
}
