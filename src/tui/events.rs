use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A keystroke normalized for the session state machines.
///
/// Keys are not bound to meanings here: the same `Char('r')` is "reveal" in a
/// masked session and a literal `r` everywhere else, so interpretation is left
/// to the transition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Ctrl(char),
    Backspace,
    Enter,
    Up,
    Down,
    Tab,
    BackTab,
    Esc,
    None,
}

/// Where sessions read their input from.
pub trait EventSource {
    /// Wait up to `timeout` for the next input; `Input::None` when nothing arrived.
    fn next_input(&mut self, timeout: Duration) -> Result<Input>;
}

/// Keyboard events from the real terminal.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_input(&mut self, timeout: Duration) -> Result<Input> {
        poll_event(timeout)
    }
}

/// Pre-recorded inputs, replayed in order. Runs dry by reporting `Esc` so a
/// session driven by a short script still terminates.
impl EventSource for VecDeque<Input> {
    fn next_input(&mut self, _timeout: Duration) -> Result<Input> {
        Ok(self.pop_front().unwrap_or(Input::Esc))
    }
}

/// Poll for keyboard events and convert to inputs
pub fn poll_event(timeout: Duration) -> Result<Input> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_input(key));
    }
    Ok(Input::None)
}

pub fn key_to_input(key: KeyEvent) -> Input {
    if key.kind == KeyEventKind::Release {
        return Input::None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Input::Esc,

        // Navigation (arrows and Emacs style)
        (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => Input::Up,
        (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => Input::Down,

        (KeyCode::Enter, _) => Input::Enter,
        (KeyCode::Backspace, _) => Input::Backspace,
        (KeyCode::Tab, _) => Input::Tab,
        (KeyCode::BackTab, _) => Input::BackTab,
        (KeyCode::Char(c), KeyModifiers::CONTROL) => Input::Ctrl(c),

        // Text input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Input::Char(c)
        }

        _ => Input::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_and_ctrl_c() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(key_to_input(esc), Input::Esc);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_input(ctrl_c), Input::Ctrl('c'));
    }

    #[test]
    fn test_navigation_emacs_style() {
        let ctrl_p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert_eq!(key_to_input(ctrl_p), Input::Up);

        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(key_to_input(ctrl_n), Input::Down);
    }

    #[test]
    fn test_navigation_arrows() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(key_to_input(up), Input::Up);

        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(key_to_input(down), Input::Down);
    }

    #[test]
    fn test_copy_and_export_chords() {
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(key_to_input(tab), Input::Tab);

        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(key_to_input(back_tab), Input::BackTab);

        let ctrl_y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(key_to_input(ctrl_y), Input::Ctrl('y'));

        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(key_to_input(ctrl_e), Input::Ctrl('e'));
    }

    #[test]
    fn test_text_input() {
        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(key_to_input(r), Input::Char('r'));

        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(key_to_input(space), Input::Char(' '));

        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_to_input(shifted), Input::Char('A'));

        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(key_to_input(backspace), Input::Backspace);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_to_input(release), Input::None);
    }

    #[test]
    fn test_unknown_key() {
        let unknown = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(key_to_input(unknown), Input::None);

        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(key_to_input(alt), Input::None);
    }

    #[test]
    fn test_scripted_source_runs_dry_with_escape() {
        let mut script: VecDeque<Input> = VecDeque::from(vec![Input::Char('a')]);
        let timeout = Duration::from_millis(0);

        assert_eq!(script.next_input(timeout).unwrap(), Input::Char('a'));
        assert_eq!(script.next_input(timeout).unwrap(), Input::Esc);
    }
}
