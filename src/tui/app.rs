//! The event loop shared by every interactive screen.
//!
//! A screen is a state machine plus a projector: [`run_screen`] reads one
//! input at a time, hands it to the screen, and redraws from the screen's
//! current [`FrameView`] until the screen reports that it is finished.

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::edit::EditSession;
use super::events::{EventSource, Input};
use super::rendering::{FrameView, Theme, project_edit, project_session, render_view};
use super::session::{Services, Session};
use super::timestamps::now_unix;

/// Redraw at least this often so terminal resizes are picked up.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

pub trait Screen {
    fn handle(&mut self, input: Input, services: &mut Services<'_>);
    fn is_terminal(&self) -> bool;
    fn view(&self, theme: &Theme, now: i64) -> FrameView;
}

impl Screen for Session {
    fn handle(&mut self, input: Input, services: &mut Services<'_>) {
        Session::handle(self, input, services);
    }

    fn is_terminal(&self) -> bool {
        Session::is_terminal(self)
    }

    fn view(&self, theme: &Theme, now: i64) -> FrameView {
        project_session(self, theme, now)
    }
}

impl Screen for EditSession {
    fn handle(&mut self, input: Input, services: &mut Services<'_>) {
        EditSession::handle(self, input, services);
    }

    fn is_terminal(&self) -> bool {
        EditSession::is_terminal(self)
    }

    fn view(&self, theme: &Theme, _now: i64) -> FrameView {
        project_edit(self, theme)
    }
}

/// Drive `screen` until it reaches an outcome.
///
/// The final frame drawn is the empty one, so nothing of the session stays
/// on screen after it ends.
pub fn run_screen<B: Backend, S: Screen>(
    screen: &mut S,
    terminal: &mut Terminal<B>,
    events: &mut dyn EventSource,
    services: &mut Services<'_>,
    theme: &Theme,
) -> Result<()> {
    let mut needs_redraw = true;
    let mut last_draw = Instant::now();

    loop {
        // Draw if dirty or if it's been >100ms (for terminal resize handling)
        let now = Instant::now();
        if needs_redraw || now.duration_since(last_draw) >= REDRAW_INTERVAL {
            let view = screen.view(theme, now_unix());
            terminal.draw(|f| render_view(f, &view, theme))?;
            needs_redraw = false;
            last_draw = now;
        }

        if screen.is_terminal() {
            break;
        }

        let input = events.next_input(REDRAW_INTERVAL)?;
        if input != Input::None {
            screen.handle(input, services);
            needs_redraw = true;
        }
    }

    Ok(())
}

/// Feed `inputs` to `screen` without a terminal, stopping early once it
/// finishes.
pub fn replay<S: Screen>(
    screen: &mut S,
    inputs: impl IntoIterator<Item = Input>,
    services: &mut Services<'_>,
) {
    for input in inputs {
        if screen.is_terminal() {
            break;
        }
        screen.handle(input, services);
    }
}
