pub mod developer_info;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use webbrowser::Browser;

use crate::{
    app::App,
    clock::Clock,
    config::HighlightMode,
    score::{Outcome, ScoreResult},
    ui::developer_info::{DeveloperInfo, Link},
};

const HORIZONTAL_MARGIN: u16 = 5;
const INPUT_HEIGHT: u16 = 3;

pub const TITLE: &str = "Type the text below";

/// Render whichever view the session phase calls for.
pub fn draw<C: Clock>(app: &App<C>, f: &mut Frame) {
    screen::current_screen(app.session.phase()).render(app, f);
}

struct TypingLayout {
    title: Rect,
    passage: Rect,
    input: Rect,
    footer: Option<Rect>,
}

fn margin_for(area: Rect) -> u16 {
    // tiny terminals get the full width
    if area.width > HORIZONTAL_MARGIN * 4 {
        HORIZONTAL_MARGIN
    } else {
        0
    }
}

fn typing_layout<C: Clock>(app: &App<C>, area: Rect) -> TypingLayout {
    let margin = margin_for(area);
    let max_chars_per_line = area.width.saturating_sub(margin * 2).max(1);

    let passage_lines = passage_paragraph(app).line_count(max_chars_per_line);
    let passage_lines = u16::try_from(passage_lines).unwrap_or(u16::MAX);

    let footer_height = if app.settings.show_developer_info {
        developer_info::HEIGHT
    } else {
        0
    };

    let content_height =
        passage_lines.saturating_add(1 + 1 + 1 + INPUT_HEIGHT + 1 + footer_height);
    let top = area.height.saturating_sub(content_height) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(margin)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(passage_lines),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(footer_height),
            Constraint::Min(0),
        ])
        .split(area);

    TypingLayout {
        title: chunks[1],
        passage: chunks[3],
        input: chunks[5],
        footer: app.settings.show_developer_info.then_some(chunks[7]),
    }
}

fn input_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::DIM))
}

/// Tail of the typed buffer that fits in `width` columns, keeping one
/// column free for the caret.
fn visible_tail(typed: &[char], width: u16) -> String {
    let budget = (width as usize).saturating_sub(1);
    let mut used = 0;
    let mut start = typed.len();

    for (idx, c) in typed.iter().enumerate().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start = idx;
    }

    typed[start..].iter().collect()
}

/// Caret position inside the mirrored input field, always at the end of
/// the visible text. `None` once finished or when the field has no room.
pub fn input_cursor<C: Clock>(app: &App<C>, area: Rect) -> Option<Position> {
    if app.session.is_finished() {
        return None;
    }

    let inner = input_block().inner(typing_layout(app, area).input);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }

    let visible = visible_tail(app.session.typed(), inner.width);
    Some(Position::new(inner.x + visible.width() as u16, inner.y))
}

fn mark_style(highlight: HighlightMode, outcome: Option<Outcome>) -> Style {
    let base = Style::default();
    match (highlight, outcome) {
        (_, None) => base,
        (HighlightMode::Background, Some(Outcome::Correct)) => base.bg(Color::Green).fg(Color::Black),
        (HighlightMode::Background, Some(Outcome::Incorrect)) => base.bg(Color::Red).fg(Color::Black),
        (HighlightMode::Foreground, Some(Outcome::Correct)) => {
            base.fg(Color::Green).add_modifier(Modifier::BOLD)
        }
        (HighlightMode::Foreground, Some(Outcome::Incorrect)) => {
            base.fg(Color::Red).add_modifier(Modifier::BOLD)
        }
    }
}

/// The passage with one styled span per character, wrapped on words. The
/// layout measures this same paragraph so the wrapped height always fits.
fn passage_paragraph<C: Clock>(app: &App<C>) -> Paragraph<'static> {
    let spans = app
        .session
        .marks()
        .map(|(expected, outcome)| {
            Span::styled(expected.to_string(), mark_style(app.settings.highlight, outcome))
        })
        .collect::<Vec<Span>>();

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
}

fn render_typing<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let layout = typing_layout(app, area);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    Paragraph::new(Span::styled(TITLE, bold_style))
        .alignment(Alignment::Center)
        .render(layout.title, buf);

    passage_paragraph(app).render(layout.passage, buf);

    let block = input_block();
    let inner = block.inner(layout.input);
    block.render(layout.input, buf);
    Paragraph::new(visible_tail(app.session.typed(), inner.width)).render(inner, buf);

    if let Some(footer) = layout.footer {
        DeveloperInfo.render(footer, buf);
    }
}

fn legend() -> String {
    if Browser::is_available() {
        format!(
            "(r)estart / (g) {} / (l) {} / (esc)ape",
            Link::GitHub.label(),
            Link::LinkedIn.label()
        )
    } else {
        String::from("(r)estart / (esc)ape")
    }
}

fn render_results<C: Clock>(app: &App<C>, score: &ScoreResult, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let footer_height = if app.settings.show_developer_info {
        developer_info::HEIGHT
    } else {
        0
    };
    let content_height = 5 + 1 + footer_height;
    let top = area.height.saturating_sub(content_height) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(margin_for(area))
        .constraints([
            Constraint::Length(top),
            Constraint::Length(1), // accuracy
            Constraint::Length(1), // wpm
            Constraint::Length(1), // time
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
            Constraint::Length(1), // padding
            Constraint::Length(footer_height),
            Constraint::Min(0),
        ])
        .split(area);

    let lines = [
        (format!("{}%", score.accuracy()), bold_style),
        (format!("Words per minute: {}", score.wpm()), Style::default()),
        (format!("Time: {} seconds", score.elapsed_secs()), Style::default()),
    ];

    for (chunk, (text, style)) in chunks[1..4].iter().zip(lines) {
        Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .render(*chunk, buf);
    }

    Paragraph::new(Span::styled(legend(), italic_style))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    if app.settings.show_developer_info {
        DeveloperInfo.render(chunks[7], buf);
    }
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.session.score() {
            None => render_typing(self, area, buf),
            Some(score) => render_results(self, score, area, buf),
        }
    }
}
