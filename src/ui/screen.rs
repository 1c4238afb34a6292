use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use webbrowser::Browser;

use crate::{
    app::App,
    router::ScreenState,
    session::SessionState,
    share::format_elapsed,
    ui::{self, digits, Styles, HORIZONTAL_MARGIN, VERTICAL_MARGIN},
};

/// A UI Screen boundary: responsible for rendering one router state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Main menu - pick an alphabet and start
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let styles = Styles::default();
        let chunks = ui::centered_rows(area, &[1, 1, 1, 1, 1, 1, 1]);

        Paragraph::new(Span::styled("alphabet-typer", styles.bold))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "Find out how fast you can type the whole {} alphabet",
                app.alphabet().title()
            ),
            styles.italic,
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

        let preview: String = app
            .alphabet()
            .letters()
            .iter()
            .flat_map(|c| c.to_uppercase())
            .collect();
        Paragraph::new(Span::styled(preview, styles.dim_bold))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let title = Span::styled(app.alphabet().title().to_string(), styles.magenta_bold);
        let (selector, legend) = if app.is_custom_alphabet() {
            (Line::from(title), "(enter) start / (esc)ape")
        } else {
            (
                Line::from(vec![
                    Span::styled("< ", styles.dim_bold),
                    title,
                    Span::styled(" >", styles.dim_bold),
                ]),
                "(enter) start / (←/→) alphabet / (esc)ape",
            )
        };
        Paragraph::new(selector)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        ui::render_legend(legend, area, buf);
    }
}

/// Game screen - countdown numeral, then the live alphabet row
pub struct GameScreen;

impl GameScreen {
    fn render_countdown(ticks_remaining: u8, area: Rect, buf: &mut Buffer) {
        let styles = Styles::default();

        let lines: Vec<Line> = match digits::glyph(ticks_remaining) {
            Some(rows) if area.height >= digits::GLYPH_HEIGHT => rows
                .iter()
                .map(|row| Line::from(Span::styled(*row, styles.bold)))
                .collect(),
            _ => vec![Line::from(Span::styled(ticks_remaining.to_string(), styles.bold))],
        };

        let height = lines.len() as u16;
        let chunks = ui::centered_rows(area, &[height]);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
    }

    fn render_active(app: &App, area: Rect, buf: &mut Buffer) {
        let Some(session) = app.session() else {
            return;
        };
        let styles = Styles::default();
        let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
        let letters = ui::alphabet_spans(session.alphabet(), &session.evaluation(), inner_width);
        let letter_lines = ui::wrapped_height(&letters, inner_width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN.min(area.height / 4))
            .constraints([
                Constraint::Length(1), // elapsed
                Constraint::Fill(1),
                Constraint::Length(letter_lines),
                Constraint::Length(1), // padding
                Constraint::Length(1), // typed input
                Constraint::Length(1), // progress
                Constraint::Fill(1),
            ])
            .split(area);

        let elapsed_ms = session.elapsed(app.now()).as_millis() as u64;
        Paragraph::new(Span::styled(
            format!("{} sec", format_elapsed(elapsed_ms)),
            styles.bold,
        ))
        .alignment(Alignment::Right)
        .render(chunks[0], buf);

        Paragraph::new(Line::from(letters))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("> ", styles.dim_bold),
            Span::styled(ui::tail(session.input(), inner_width.saturating_sub(3)), styles.bold),
            Span::styled("_", styles.underlined_dim_bold),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        let eval = session.evaluation();
        Paragraph::new(Span::styled(
            format!("{}/{}", eval.correct_count(), session.alphabet().len()),
            styles.italic,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        ui::render_legend("(tab) restart / (esc)ape", area, buf);
    }
}

impl Screen for GameScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        match app.session().map(|s| s.state()) {
            Some(SessionState::Countdown { ticks_remaining }) => {
                Self::render_countdown(ticks_remaining, area, buf);
                ui::render_legend("(tab) restart / (esc)ape", area, buf);
            }
            Some(SessionState::Active { .. }) | Some(SessionState::Finished { .. }) => {
                Self::render_active(app, area, buf)
            }
            None => {}
        }
    }
}

/// Score board - final time and share option
pub struct ScoreScreen {
    pub elapsed_ms: u64,
}

impl Screen for ScoreScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let styles = Styles::default();
        let chunks = ui::centered_rows(area, &[1, 1, 1, 1, 1]);

        Paragraph::new(Span::styled("Your result", styles.italic))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(format_elapsed(self.elapsed_ms), styles.green_bold),
            Span::styled(" sec.", Style::default()),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            format!("{} alphabet", app.alphabet().title()),
            styles.dim_bold,
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        ui::render_legend(
            if Browser::is_available() {
                "(r)etry / (t)weet / (esc)ape"
            } else {
                "(r)etry / (esc)ape"
            },
            area,
            buf,
        );
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &ScreenState) -> Box<dyn Screen> {
    match state {
        ScreenState::MainMenu => Box::new(MenuScreen),
        ScreenState::Game(_) => Box::new(GameScreen),
        ScreenState::ScoreBoard { elapsed_ms } => Box::new(ScoreScreen {
            elapsed_ms: *elapsed_ms,
        }),
    }
}
