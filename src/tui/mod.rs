// Interactive screens: list sessions (see, peek, get, env) and the edit form
pub mod app;
pub mod dispatch;
pub mod edit;
pub mod events;
pub mod filter;
mod layout;
pub mod rendering;
pub mod session;
mod terminal;
pub mod timestamps;

use anyhow::Result;
pub use app::{Screen, replay, run_screen};
pub use dispatch::{CopyFormat, Flash};
pub use edit::{EditField, EditSession};
pub use events::{EventSource, Input, TerminalEvents};
pub use filter::filtered_view;
pub use rendering::{FrameView, Theme};
pub use session::{Mode, Outcome, Phase, Services, Session};
use terminal::TerminalManager;

/// Run `screen` on the real terminal until it reaches an outcome.
pub fn run_interactive<S: Screen>(screen: &mut S, services: &mut Services<'_>) -> Result<()> {
    let mut manager = TerminalManager::new()?;
    let result = run_screen(
        screen,
        manager.terminal_mut(),
        &mut TerminalEvents,
        services,
        &Theme::default(),
    );
    manager.restore()?;
    result
}
