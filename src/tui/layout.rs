use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of a bordered single-line input box.
const INPUT_HEIGHT: u16 = 3;

/// Vertical layout of one frame
pub struct AppLayout {
    pub title_area: Option<Rect>,
    pub input_areas: Vec<Rect>,
    pub body_area: Rect,
    pub hint_area: Rect,
}

impl AppLayout {
    /// Stack, top to bottom:
    /// - Optional title row
    /// - One bordered box per input field
    /// - Body (list, messages), taking the remaining rows
    /// - Hint line (1 row)
    pub fn new(area: Rect, input_count: usize, has_title: bool) -> Self {
        let mut constraints = Vec::with_capacity(input_count + 3);
        if has_title {
            constraints.push(Constraint::Length(1));
        }
        constraints.extend(std::iter::repeat_n(Constraint::Length(INPUT_HEIGHT), input_count));
        constraints.push(Constraint::Min(1));
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);

        let mut rows = chunks.iter().copied();
        let title_area = if has_title { rows.next() } else { None };
        let input_areas: Vec<Rect> = rows.by_ref().take(input_count).collect();
        let body_area = rows.next().unwrap_or_default();
        let hint_area = rows.next().unwrap_or_default();

        Self { title_area, input_areas, body_area, hint_area }
    }
}
