use std::{
    io::{self, stdin},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info, warn};

use typespeed::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, EventSource, Runner},
    words::WordList,
};

/// timed typing test: type the shown words, get gross wpm, net wpm and cpm
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// newline-separated word list to draw words from [default: word_list.txt]
    #[clap(short = 'w', long)]
    word_list: Option<PathBuf>,

    /// length of the test in seconds [default: 60]
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// words on screen at once: the current word, plus one preview when 2 [default: 2]
    #[clap(short = 'q', long, value_parser = clap::value_parser!(u8).range(1..=2))]
    queue_len: Option<u8>,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of stored settings
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(ref path) = self.word_list {
            cfg.word_list = path.clone();
        }
        if let Some(secs) = self.seconds {
            cfg.seconds = secs;
        }
        if let Some(n) = self.queue_len {
            cfg.queue_len = n as usize;
        }
        cfg
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init(&dir));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("typespeed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = FileConfigStore::new();
    let cfg = cli.apply(store.load());

    if cli.save_config {
        store
            .save(&cfg)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
        info!(path = %store.path().display(), "saved config");
    }

    let words = WordList::load(&cfg.word_list)?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;
    let _restore = TerminalGuard {
        restore: restore_terminal,
    };
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(words, cfg.session_config());
    let runner = Runner::new(CrosstermEventSource::new());
    start_tui(&mut terminal, &mut app, &runner)
}

/// Runs `restore` when dropped, so every exit path after raw mode is
/// enabled hands the terminal back.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        warn!(%err, "failed to leave raw mode");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        warn!(%err, "failed to leave alternate screen");
    }
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> anyhow::Result<()> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let event = runner.step(&mut app.timers);
        if app.handle_event(event) == Control::Quit {
            break;
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
