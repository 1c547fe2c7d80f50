use std::io::{self, Stdout, Write};

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

/// Raw mode, the alternate screen and bracketed paste for as long as the
/// guard lives. Dropping it hands the terminal back in its original state.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            restore(&mut stdout);
            return Err(err);
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore(&mut io::stdout());
                return Err(err);
            }
        };
        debug!("terminal acquired");

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore(self.terminal.backend_mut());
        if let Err(err) = self.terminal.show_cursor() {
            warn!(%err, "failed to show cursor");
        }
        debug!("terminal released");
    }
}

/// Undo everything `acquire` may have switched on. Every step runs even when
/// an earlier one fails.
fn restore<W: Write>(out: &mut W) {
    if let Err(err) = disable_raw_mode() {
        warn!(%err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(out, DisableBracketedPaste) {
        warn!(%err, "failed to disable bracketed paste");
    }
    if let Err(err) = execute!(out, LeaveAlternateScreen) {
        warn!(%err, "failed to leave alternate screen");
    }
}
