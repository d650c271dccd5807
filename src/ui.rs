pub mod playfield;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{
    app::{App, Flash},
    session::SessionState,
    stats::SessionStats,
    ui::playfield::Playfield,
};

const HORIZONTAL_MARGIN: u16 = 2;

/// Draw the screen for the session's current state
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.session.state()).render(app, f);
}

/// Areas every screen is laid out on
pub struct Regions {
    pub title: Rect,
    pub stats: Rect,
    pub playfield: Rect,
    pub input: Rect,
    pub footer: Rect,
}

impl Regions {
    pub fn split(area: Rect, show_stats: bool) -> Self {
        let [title, stats, playfield, input, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(if show_stats { 3 } else { 0 }),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .horizontal_margin(HORIZONTAL_MARGIN)
        .areas(area);

        Self {
            title,
            stats,
            playfield,
            input,
            footer,
        }
    }
}

pub fn render_title(area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        "wordrace - type the falling words before they hit the road",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

pub fn render_stats(stats: &SessionStats, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(format!("{}", stats.score), bold.fg(Color::Blue)),
        Span::raw(" score   "),
        Span::styled(format!("{}", stats.wpm), bold.fg(Color::Green)),
        Span::raw(" wpm   "),
        Span::styled(format!("{}%", stats.accuracy), bold.fg(Color::Magenta)),
        Span::raw(" acc   "),
        Span::styled(format!("{}", stats.streak), bold.fg(Color::Yellow)),
        Span::raw(" streak   "),
        Span::styled(format!("{}s", stats.time_remaining), bold.fg(Color::Red)),
        Span::raw(" left"),
    ]);

    Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(area, buf);
}

pub fn render_playfield(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    block.render(area, buf);

    let session = &app.session;
    Playfield {
        words: session.words(),
        game_height: session.config().game_height,
        car_position: session.car_position(),
        highlight: session.input(),
    }
    .render(inner, buf);
}

pub fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let (text, style) = match session.state() {
        SessionState::Playing => (
            format!("{}_", session.input()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        SessionState::Waiting => (
            "Press Enter to start".to_string(),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ),
        SessionState::GameOver => (
            "Round over".to_string(),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ),
    };

    let title = match &app.flash {
        Some(Flash::Completed { word, points }) => Span::styled(
            format!(" {word} +{points} "),
            Style::default().fg(Color::Green),
        ),
        Some(Flash::Missed(word)) => {
            Span::styled(format!(" missed {word} "), Style::default().fg(Color::Red))
        }
        Some(Flash::Mismatch) => Span::styled(" no match ", Style::default().fg(Color::Yellow)),
        None => Span::raw(""),
    };

    Paragraph::new(Span::styled(text, style))
        .block(Block::default().borders(Borders::ALL).title(title))
        .render(area, buf);
}

pub fn render_footer(state: SessionState, area: Rect, buf: &mut Buffer) {
    let legend = match state {
        SessionState::Waiting => "(enter) start / (esc) quit",
        SessionState::Playing => "(enter) submit / (esc) end round",
        SessionState::GameOver => "(enter) back / (space) play again / (esc) quit",
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(area, buf);
}

pub fn render_instructions(round_secs: u32, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            "How to play",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Words fall from the top of the lane"),
        Line::from("Type each word exactly and press Enter"),
        Line::from("Your car drives further as your wpm goes up"),
        Line::from("A word that reaches the road breaks your streak"),
        Line::from(format!(
            "You have {round_secs} seconds to score as many points as you can"
        )),
    ];
    let popup = centered(area, 62, lines.len() as u16 + 2);
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

pub fn render_summary(stats: &SessionStats, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Game Over!", bold)),
        Line::from(""),
        labelled("Final score: ", stats.score.to_string()),
        labelled("Words per minute: ", stats.wpm.to_string()),
        labelled("Accuracy: ", format!("{}%", stats.accuracy)),
        labelled(
            "Words typed: ",
            format!("{} / {}", stats.correct_words, stats.total_words),
        ),
        labelled("Best streak: ", stats.best_streak.to_string()),
    ];
    let popup = centered(area, 36, lines.len() as u16 + 2);
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(popup, buf);
}

fn labelled(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
