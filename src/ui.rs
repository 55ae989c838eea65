use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, NoticeKind},
    game::{GameState, MAX_TRY_COUNT},
    guess::Guess,
    oec,
};

const HORIZONTAL_MARGIN: u16 = 2;
const NAME_COLUMN_WIDTH: u16 = 24;
const SUGGESTION_LIMIT: usize = 4;

/// Shorten `name` to `max` display columns, ending with an ellipsis
fn fit_name(name: &str, max: usize) -> String {
    if name.width() <= max {
        return name.to_string();
    }
    let mut out = String::new();
    for c in name.chars() {
        if out.width() + 2 > max {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

fn guess_row(guess: &Guess) -> Row<'static> {
    let hit = guess.is_hit();
    let style = if hit {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(fit_name(guess.display_name(), NAME_COLUMN_WIDTH as usize)),
        Cell::from(format!("{} km", guess.distance / 1000)),
        Cell::from(guess.direction.arrow()),
        Cell::from(format!("{}%", guess.proximity())),
    ])
    .style(style)
}

fn empty_row() -> Row<'static> {
    Row::new(vec![Cell::from("·"), Cell::from(""), Cell::from(""), Cell::from("")])
        .style(Style::default().add_modifier(Modifier::DIM))
}

impl App {
    fn render_visualization(&self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let mut lines = Vec::new();

        if self.visualization_hidden() {
            lines.push(Line::from(Span::styled(
                "Exports hidden, press Ctrl-H to show the country",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                oec::embed_url(self.game.target()),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(Span::styled(
                "Ctrl-O opens the tree map in your browser",
                dim,
            )));
            if self.config.rotation_mode && !self.game.has_ended() {
                lines.push(Line::from(Span::styled(
                    "🌀 rotation mode on, Ctrl-R to cancel",
                    Style::default().fg(Color::Magenta),
                )));
            }
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Guess which country exports these products!"),
            )
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_guesses(&self, area: Rect, buf: &mut Buffer) {
        let guesses = self.game.guesses();
        let rows: Vec<Row> = (0..MAX_TRY_COUNT)
            .map(|i| guesses.get(i).map(guess_row).unwrap_or_else(empty_row))
            .collect();

        let widths = [
            Constraint::Length(NAME_COLUMN_WIDTH),
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Length(5),
        ];

        Table::new(rows, widths)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Guesses {}/{}",
                guesses.len(),
                MAX_TRY_COUNT
            )))
            .render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let lines = match self.game.state() {
            GameState::Playing => {
                let suggestions = self
                    .game
                    .suggestions(SUGGESTION_LIMIT)
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" · ");
                vec![
                    Line::from(vec![
                        Span::styled("🌍 ", bold),
                        Span::styled(self.game.input.clone(), bold),
                        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                    ]),
                    Line::from(Span::styled(suggestions, dim)),
                ]
            }
            GameState::Won => vec![Line::from(Span::styled(
                format!(
                    "Found {} in {} {}!",
                    self.game.target().name,
                    self.game.guesses().len(),
                    if self.game.guesses().len() == 1 { "guess" } else { "guesses" }
                ),
                Style::default().fg(Color::Green).patch(bold),
            ))],
            GameState::Lost => vec![Line::from(Span::styled(
                format!("The answer was {}", self.game.target().name),
                Style::default().fg(Color::Red).patch(bold),
            ))],
        };

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
    }

    fn render_notice(&self, area: Rect, buf: &mut Buffer) {
        let Some(notice) = &self.notice else {
            return;
        };
        let color = match notice.kind {
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Error => Color::Red,
            NoticeKind::Success => Color::Green,
        };
        Paragraph::new(Span::styled(
            notice.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let help = if self.game.has_ended() {
            "(n)ew game / (o)pen OEC profile / (t)weet / (esc)ape"
        } else {
            "(enter) guess / (tab) complete / (ctrl-s) skip / (esc)ape"
        };
        Paragraph::new(Span::styled(
            help,
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(5),                         // visualization
                Constraint::Length(MAX_TRY_COUNT as u16 + 2), // guesses
                Constraint::Length(4),                         // input
                Constraint::Length(1),                         // notice
                Constraint::Min(0),
                Constraint::Length(1), // help
            ])
            .split(area);

        self.render_visualization(chunks[0], buf);
        self.render_guesses(chunks[1], buf);
        self.render_input(chunks[2], buf);
        self.render_notice(chunks[3], buf);
        self.render_help(chunks[5], buf);
    }
}
