use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use tracing::warn;

pub const DEVELOPER_NAME: &str = "Kayky de Sousa";

/// Rows the attribution occupies
pub const HEIGHT: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    LinkedIn,
    GitHub,
}

impl Link {
    pub fn label(self) -> &'static str {
        match self {
            Link::LinkedIn => "Linkedin",
            Link::GitHub => "Github",
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Link::LinkedIn => "https://www.linkedin.com/in/kayky-de-sousa/",
            Link::GitHub => "https://github.com/KaykySousa",
        }
    }
}

/// Open a link in the system browser. Failures are only logged.
pub fn open(link: Link) {
    if let Err(err) = webbrowser::open(link.url()) {
        warn!(url = link.url(), %err, "failed to open link");
    }
}

/// Static attribution footer
#[derive(Clone, Copy, Debug, Default)]
pub struct DeveloperInfo;

impl Widget for DeveloperInfo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let link = dim.add_modifier(Modifier::UNDERLINED);

        let lines = vec![
            Line::from(Span::styled(format!("Developed by: {DEVELOPER_NAME}"), dim)),
            Line::from(vec![
                Span::styled(Link::LinkedIn.url(), link),
                Span::styled(" | ", dim),
                Span::styled(Link::GitHub.url(), link),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
