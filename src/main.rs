use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;
use std::{error::Error, io::stdin, path::PathBuf};
use tracing::{info, warn};

use typetrial::{
    app::{App, Settings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, HighlightMode},
    logging,
    runtime::{self, CrosstermEventSource, FixedTicker, Runner},
    terminal::TerminalGuard,
};

/// typing speed trial in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the displayed passage. Characters light up green or red as you go; when the passage is done you get accuracy, words per minute and elapsed time."
)]
pub struct Cli {
    /// seed for passage selection, for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// how typed characters are highlighted
    #[clap(long, value_enum)]
    highlight: Option<HighlightMode>,

    /// hide the developer attribution footer
    #[clap(long)]
    hide_developer_info: bool,

    /// log filter directive (e.g. "debug"); RUST_LOG takes precedence
    #[clap(long)]
    log_level: Option<String>,

    /// path to the config file
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Layer CLI flags over the file config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(highlight) = self.highlight {
            cfg.highlight = highlight;
        }
        if self.hide_developer_info {
            cfg.show_developer_info = false;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli.config_store();
    let cfg = cli.apply(store.load());

    // a bad --log-level is the user's to fix; a bad config value is not fatal
    let (filter, rejected) = match &cli.log_level {
        Some(level) => (logging::env_filter(level)?, None),
        None => logging::env_filter_or_default(&cfg.log_level),
    };

    let _log_guard = match AppDirs::log_dir().map(|dir| logging::init(&dir, filter)) {
        Some(Ok(guard)) => Some(guard),
        Some(Err(err)) => {
            eprintln!("typetrial: file logging disabled: {err}");
            None
        }
        None => None,
    };

    if let Some(err) = rejected {
        warn!(directive = %cfg.log_level, %err, "ignoring configured log level");
    }
    info!(
        highlight = %cfg.highlight,
        show_developer_info = cfg.show_developer_info,
        "starting"
    );

    if cli.save_config {
        store.save(&cfg)?;
        info!(path = %store.path().display(), "saved config");
    }

    let mut app = App::new(Settings::from(&cfg), cli.seed);
    let runner = Runner::new(CrosstermEventSource, FixedTicker::default());

    let mut guard = TerminalGuard::acquire()?;
    runtime::drive(guard.terminal_mut(), &mut app, &runner)?;

    Ok(())
}
