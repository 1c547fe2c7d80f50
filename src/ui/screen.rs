use ratatui::Frame;

use crate::{app::App, clock::Clock, session::Phase, ui::input_cursor};

/// A UI Screen boundary: responsible for rendering one view of the app
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame);
}

/// Typing screen - passage, mirrored input field and the caret at its end
pub struct TypingScreen;

impl<C: Clock> Screen<C> for TypingScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        let area = f.area();
        f.render_widget(app, area);

        if let Some(position) = input_cursor(app, area) {
            f.set_cursor_position(position);
        }
    }
}

/// Results screen - statistics and the restart legend, no caret
pub struct ResultsScreen;

impl<C: Clock> Screen<C> for ResultsScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen<C: Clock>(phase: Phase) -> Box<dyn Screen<C>> {
    match phase {
        Phase::NotStarted | Phase::InProgress => Box::new(TypingScreen),
        Phase::Finished => Box::new(ResultsScreen),
    }
}
