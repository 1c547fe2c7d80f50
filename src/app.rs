use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;
use webbrowser::Browser;

use crate::{
    clock::{Clock, SystemClock},
    config::{Config, HighlightMode},
    runtime::AppEvent,
    session::{Keystroke, Phase, TypingSession},
    ui::developer_info::{self, Link},
};

/// Settings in effect for this run, after CLI flags are layered on the
/// config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub highlight: HighlightMode,
    pub show_developer_info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Settings {
    fn from(cfg: &Config) -> Self {
        Self {
            highlight: cfg.highlight,
            show_developer_info: cfg.show_developer_info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub session: TypingSession<C>,
    pub settings: Settings,
}

impl App {
    pub fn new(settings: Settings, seed: Option<u64>) -> Self {
        Self::with_session(TypingSession::new(seed), settings)
    }
}

impl<C: Clock> App<C> {
    pub fn with_session(session: TypingSession<C>, settings: Settings) -> Self {
        Self { session, settings }
    }

    pub fn on_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Paste(text) => {
                self.on_paste(&text);
                Flow::Continue
            }
            AppEvent::Resize | AppEvent::Tick => Flow::Continue,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }

        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if key.code == KeyCode::Esc || ctrl_c {
            return Flow::Quit;
        }

        match self.session.phase() {
            Phase::NotStarted | Phase::InProgress => {
                if let Some(keystroke) = keystroke(&key) {
                    self.session.handle_character_input(keystroke);
                }
            }
            Phase::Finished => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => {
                    self.session.restart();
                }
                KeyCode::Char('g') if Browser::is_available() => developer_info::open(Link::GitHub),
                KeyCode::Char('l') if Browser::is_available() => developer_info::open(Link::LinkedIn),
                _ => {}
            },
        }

        Flow::Continue
    }

    /// Paste lands in the mirrored input field after the current buffer.
    pub fn on_paste(&mut self, text: &str) {
        if self.session.is_finished() {
            return;
        }

        debug!(len = text.chars().count(), "paste");
        let mut value = self.session.typed_text();
        value.push_str(text);
        self.session.handle_input_change(&value);
    }
}

/// Keys that reach the session while it can be in progress
fn keystroke(key: &KeyEvent) -> Option<Keystroke> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Backspace => Some(Keystroke::Delete),
        KeyCode::Char(c) => Some(Keystroke::Char(c)),
        _ => None,
    }
}
