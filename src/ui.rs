pub mod digits;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    alphabet::AlphabetSequence,
    app::App,
    matcher::{Evaluation, MatchClass},
};

pub const HORIZONTAL_MARGIN: u16 = 5;
pub const VERTICAL_MARGIN: u16 = 2;

pub struct Styles {
    pub bold: Style,
    pub green_bold: Style,
    pub red_bold: Style,
    pub dim_bold: Style,
    pub underlined_dim_bold: Style,
    pub italic: Style,
    pub magenta_bold: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold = Style::default().patch(bold).add_modifier(Modifier::DIM);

        Self {
            bold,
            green_bold: Style::default().patch(bold).fg(Color::Green),
            red_bold: Style::default().patch(bold).fg(Color::Red),
            dim_bold,
            underlined_dim_bold: Style::default()
                .patch(dim_bold)
                .add_modifier(Modifier::UNDERLINED),
            italic: Style::default().add_modifier(Modifier::ITALIC),
            magenta_bold: Style::default().patch(bold).fg(Color::Magenta),
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state()).render(self, area, buf);
    }
}

/// One span per letter, upper-cased and colored by match class. Letters are
/// spaced out when the whole row still fits in `width`.
pub fn alphabet_spans(
    alphabet: &AlphabetSequence,
    eval: &Evaluation,
    width: u16,
) -> Vec<Span<'static>> {
    let styles = Styles::default();
    let letters: Vec<String> = alphabet
        .letters()
        .iter()
        .map(|c| c.to_uppercase().collect())
        .collect();

    let letters_width: usize = letters.iter().map(|l| l.width()).sum();
    let spaced = letters_width + letters.len().saturating_sub(1) <= width as usize;

    let mut spans = Vec::with_capacity(letters.len() * 2);
    for (idx, letter) in letters.into_iter().enumerate() {
        if spaced && idx > 0 {
            spans.push(Span::raw(" "));
        }
        let style = match eval.classes.get(idx) {
            Some(MatchClass::Correct) => styles.green_bold,
            Some(MatchClass::Incorrect) => styles.red_bold,
            Some(MatchClass::Untyped) | None => styles.dim_bold,
        };
        spans.push(Span::styled(letter, style));
    }
    spans
}

/// Rows needed to show `spans` wrapped at `width`
pub fn wrapped_height(spans: &[Span], width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let total: usize = spans.iter().map(|s| s.width()).sum();
    (total.div_ceil(width as usize)).max(1) as u16
}

/// The longest suffix of `s` that fits in `max_width` columns.
pub fn tail(s: &str, max_width: u16) -> String {
    let mut width = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        width += c.width().unwrap_or(0);
        if width > max_width as usize {
            break;
        }
        start = idx;
    }
    s[start..].to_string()
}

/// Split `area` into rows of the given heights, vertically centered.
pub fn centered_rows(area: Rect, heights: &[u16]) -> Vec<Rect> {
    let total: u16 = heights.iter().sum();
    let top = area.height.saturating_sub(total) / 2;

    let mut constraints = Vec::with_capacity(heights.len() + 2);
    constraints.push(Constraint::Length(top));
    constraints.extend(heights.iter().map(|h| Constraint::Length(*h)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN.min(area.width / 4))
        .constraints(constraints)
        .split(area);

    chunks[1..=heights.len()].to_vec()
}

/// Key hints on the bottom line of the screen
pub fn render_legend(text: &str, area: Rect, buf: &mut Buffer) {
    if area.height < 3 {
        return;
    }
    let margin = HORIZONTAL_MARGIN.min(area.width / 4);
    let row = Rect::new(
        area.x + margin,
        area.bottom() - 1,
        area.width.saturating_sub(margin * 2),
        1,
    );
    Paragraph::new(Span::styled(text.to_string(), Styles::default().italic)).render(row, buf);
}
