use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

use super::edit::{EditField, EditSession};
use super::layout::AppLayout;
use super::session::{Mode, Phase, Session};
use super::timestamps::{AgeBucket, age_bucket};
use crate::utils::sanitize_for_display;

/// Maximum width of an input box, borders included.
const INPUT_WIDTH: u16 = 52;
const MASK: &str = "***";

/// Styles for every element the screens draw.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub label: Style,
    pub value: Style,
    pub dim: Style,
    pub hint: Style,
    pub flash: Style,
    pub check: Style,
    pub cursor: Style,
    pub icon: Style,
    pub input: Style,
    pub placeholder: Style,
    pub border: Style,
    pub border_focused: Style,
    pub age_fresh: Style,
    pub age_aging: Style,
    pub age_stale: Style,
    pub age_unknown: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let fg = |index: u8| Style::default().fg(Color::Indexed(index));
        Self {
            title: fg(12).add_modifier(Modifier::BOLD),
            label: fg(12).add_modifier(Modifier::BOLD),
            value: fg(10),
            dim: fg(8),
            hint: fg(8).add_modifier(Modifier::ITALIC),
            flash: fg(11).add_modifier(Modifier::BOLD),
            check: fg(10).add_modifier(Modifier::BOLD),
            cursor: fg(14).add_modifier(Modifier::BOLD),
            icon: fg(12).add_modifier(Modifier::BOLD),
            input: fg(15),
            placeholder: fg(8),
            border: fg(62),
            border_focused: fg(12),
            age_fresh: fg(10),
            age_aging: fg(11),
            age_stale: fg(9),
            age_unknown: fg(8),
        }
    }
}

impl Theme {
    fn age(&self, bucket: AgeBucket) -> Style {
        match bucket {
            AgeBucket::Unknown => self.age_unknown,
            AgeBucket::Fresh => self.age_fresh,
            AgeBucket::Aging => self.age_aging,
            AgeBucket::Stale => self.age_stale,
        }
    }
}

/// A single-line text field drawn inside a rounded border.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBox {
    pub content: Line<'static>,
    pub focused: bool,
}

/// Everything one frame shows, independent of terminal size.
///
/// Built by the projectors below from session state; a default (empty) view
/// is produced once a session has ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameView {
    pub title: Option<Line<'static>>,
    pub inputs: Vec<InputBox>,
    pub body: Vec<Line<'static>>,
    /// Index into `body` of the row under the cursor, kept on screen when
    /// the list is taller than the body area.
    pub cursor_line: Option<usize>,
    pub hint: Option<Line<'static>>,
}

impl FrameView {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.inputs.is_empty() && self.body.is_empty() && self.hint.is_none()
    }

    /// The frame's text with styling dropped, one line per row.
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<&Line> = Vec::new();
        lines.extend(self.title.iter());
        lines.extend(self.inputs.iter().map(|input| &input.content));
        lines.extend(self.body.iter());
        lines.extend(self.hint.iter());

        lines.iter().map(|line| plain(line)).collect::<Vec<_>>().join("\n")
    }
}

fn plain(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn hint_line(theme: &Theme, gestures: &[(&str, &str)]) -> Line<'static> {
    let text = gestures
        .iter()
        .map(|(keys, action)| format!("{} {}", keys, action))
        .collect::<Vec<_>>()
        .join("  ");
    Line::from(Span::styled(format!("  {}", text), theme.hint))
}

fn text_input(theme: &Theme, icon: &str, label: &str, text: &str, focused: bool) -> InputBox {
    let text_style = if focused { theme.input } else { theme.dim };
    let mut spans = vec![
        Span::styled(icon.to_string(), theme.icon),
        Span::raw(" "),
        Span::styled(label.to_string(), theme.label),
        Span::styled(sanitize_for_display(text), text_style),
    ];
    if focused {
        spans.push(Span::styled("_", theme.input));
    }
    InputBox { content: Line::from(spans), focused }
}

/// Gestures live in the searching phase, in the order they are listed.
fn search_gestures(mode: Mode) -> Vec<(&'static str, &'static str)> {
    let mut gestures = Vec::new();
    gestures.push(if mode.search_enabled { ("↑/↓", "move") } else { ("↑/↓ j/k", "move") });
    if mode.multi_select {
        gestures.push(("space", if mode.search_enabled { "select" } else { "toggle" }));
    }
    if mode.masked {
        gestures.push(("r", "reveal"));
    }
    if mode.multi_select && !mode.search_enabled {
        gestures.push(("a", "toggle all"));
    }
    if mode.clipboard_actions {
        gestures.push(("S-tab/ctrl+y", "copy export"));
        gestures.push(("tab", "copy KEY=VAL"));
        gestures.push(("ctrl+e", "export .env"));
    }
    gestures.push(if mode.add_flow_enabled {
        ("enter", "add key")
    } else if mode.multi_select {
        ("enter", "confirm")
    } else {
        ("enter", "select")
    });
    gestures.push(if mode.search_enabled { ("esc", "quit") } else { ("q/esc", "quit") });
    gestures
}

/// Project a list session onto a frame.
///
/// `now` is the unix time used to bucket entry ages.
pub fn project_session(session: &Session, theme: &Theme, now: i64) -> FrameView {
    if session.is_terminal() {
        return FrameView::default();
    }

    match session.phase() {
        Phase::Searching => project_search(session, theme, now),
        Phase::EnteringNewName => FrameView {
            inputs: vec![text_input(theme, "+", "Name: ", session.pending_name(), true)],
            hint: Some(hint_line(theme, &[("enter", "next"), ("esc", "quit")])),
            ..Default::default()
        },
        Phase::EnteringNewValue => FrameView {
            inputs: vec![
                text_input(theme, "+", "Name: ", session.pending_name(), false),
                text_input(theme, "+", "Value: ", session.pending_value(), true),
            ],
            hint: Some(hint_line(theme, &[("enter", "save"), ("esc", "quit")])),
            ..Default::default()
        },
    }
}

fn project_search(session: &Session, theme: &Theme, now: i64) -> FrameView {
    let mode = session.mode();
    let mut view = FrameView::default();

    if mode.search_enabled {
        let query = session.search_text();
        let text = if query.is_empty() {
            let placeholder = if mode.add_flow_enabled { "Search keys..." } else { "Type to search..." };
            Span::styled(placeholder, theme.placeholder)
        } else {
            Span::styled(sanitize_for_display(query), theme.input)
        };
        let content = Line::from(vec![
            Span::styled("⌕", theme.icon),
            Span::raw(" "),
            text,
            Span::styled("_", theme.input),
        ]);
        view.inputs.push(InputBox { content, focused: true });
    } else {
        view.title = Some(Line::from(Span::styled("Select keys for .env file", theme.title)));
    }

    if let Some(flash) = session.flash() {
        view.body.push(Line::from(Span::styled(format!("  {}", flash.message()), theme.flash)));
    }
    let selected = session.selected_count();
    if selected > 0 {
        view.body.push(Line::from(Span::styled(format!("  {} selected", selected), theme.dim)));
    }

    let matches = session.view();
    if matches.is_empty() {
        if session.search_text().is_empty() {
            view.body.push(Line::from(Span::styled("  No keys stored yet.", theme.dim)));
        } else if mode.add_flow_enabled {
            view.body.push(Line::from(Span::styled("  No keys found.", theme.dim)));
            view.body.push(Line::from(Span::styled("  Press enter to add a new key", theme.hint)));
        } else {
            view.body.push(Line::from(Span::styled("  No matching keys.", theme.dim)));
        }
    }

    for (idx, entry) in matches.iter().enumerate() {
        let at_cursor = idx == session.cursor();
        let checked = session.is_selected(&entry.name);

        let mut spans = Vec::with_capacity(6);
        spans.push(if at_cursor { Span::styled("> ", theme.cursor) } else { Span::raw("  ") });
        if mode.multi_select {
            spans.push(if checked {
                Span::styled("[x] ", theme.check)
            } else {
                Span::styled("[ ] ", theme.dim)
            });
        }

        let name_style = if at_cursor {
            theme.label
        } else if checked && !mode.clipboard_actions {
            theme.value
        } else {
            theme.dim
        };

        if mode.clipboard_actions {
            let bucket = age_bucket(entry.updated_at, now);
            spans.push(Span::styled(format!("{} ", bucket.glyph()), theme.age(bucket)));

            let value = if mode.masked && !session.is_revealed(&entry.name) {
                MASK.to_string()
            } else {
                sanitize_for_display(&entry.value)
            };
            let value_style = if at_cursor { theme.value } else { theme.dim };
            spans.push(Span::styled(sanitize_for_display(&entry.name), name_style));
            spans.push(Span::raw(" = "));
            spans.push(Span::styled(value, value_style));
        } else {
            spans.push(Span::styled(sanitize_for_display(&entry.name), name_style));
        }

        if at_cursor {
            view.cursor_line = Some(view.body.len());
        }
        view.body.push(Line::from(spans));
    }

    view.hint = Some(hint_line(theme, &search_gestures(mode)));
    view
}

/// Project the edit screen onto a frame.
pub fn project_edit(session: &EditSession, theme: &Theme) -> FrameView {
    if session.is_terminal() {
        return FrameView::default();
    }

    let focus = session.focus();
    FrameView {
        inputs: vec![
            text_input(theme, "✎", "Name: ", session.name(), focus == EditField::Name),
            text_input(theme, "✎", "Value: ", session.value(), focus == EditField::Value),
        ],
        hint: Some(hint_line(
            theme,
            &[("tab", "switch field"), ("enter", "save"), ("esc", "cancel")],
        )),
        ..Default::default()
    }
}

/// Draw a projected frame. An empty view clears the screen.
pub fn render_view(frame: &mut Frame, view: &FrameView, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    if view.is_empty() {
        return;
    }

    let layout = AppLayout::new(area, view.inputs.len(), view.title.is_some());

    if let (Some(title), Some(title_area)) = (&view.title, layout.title_area) {
        frame.render_widget(Paragraph::new(title.clone()), title_area);
    }

    for (input, input_area) in view.inputs.iter().zip(&layout.input_areas) {
        let border = if input.focused { theme.border_focused } else { theme.border };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .padding(Padding::horizontal(1));
        let input_area = Rect { width: input_area.width.min(INPUT_WIDTH), ..*input_area };
        frame.render_widget(Paragraph::new(input.content.clone()).block(block), input_area);
    }

    render_body(frame, layout.body_area, view);

    if let Some(hint) = &view.hint {
        frame.render_widget(Paragraph::new(hint.clone()), layout.hint_area);
    }
}

fn render_body(frame: &mut Frame, area: Rect, view: &FrameView) {
    let height = usize::from(area.height.max(1));
    let offset = view.cursor_line.map(|line| (line + 1).saturating_sub(height)).unwrap_or(0);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(view.body.clone()).scroll((offset, 0)), area);
}
