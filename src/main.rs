use anyhow::{anyhow, Context};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wordrace::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, GameConfig},
    runtime::{Runner, TerminalEvents, WallClock},
    session::Session,
    ui,
    vocabulary::{Vocabulary, DEFAULT_VOCABULARY},
    TICK_RATE_MS,
};

/// type the falling words before they hit the road
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing game: words fall down a lane, type each one and press Enter before it reaches the road. Your car drives further the faster you type."
)]
pub struct Cli {
    /// round length in seconds
    #[clap(short = 's', long)]
    secs: Option<u32>,

    /// maximum number of words falling at once
    #[clap(short = 'm', long)]
    max_words: Option<usize>,

    /// seed for word choice and placement, for repeatable rounds
    #[clap(long)]
    seed: Option<u64>,

    /// game settings file (json); defaults to the platform config directory
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// custom word list (json with a "words" array)
    #[clap(long)]
    vocabulary: Option<PathBuf>,

    /// write logs to the default log file
    #[clap(long)]
    log: bool,

    /// write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Resolve settings from the config file, then apply command line overrides
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let store = match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        let mut cfg = store.load()?;

        if let Some(secs) = self.secs {
            cfg.round_secs = secs;
        }
        if let Some(max_words) = self.max_words {
            cfg.max_words = max_words;
        }
        cfg.validate().context("invalid command line settings")?;
        Ok(cfg)
    }

    fn vocabulary(&self) -> anyhow::Result<Vocabulary> {
        match &self.vocabulary {
            Some(path) => Vocabulary::from_file(path),
            None => Vocabulary::embedded(DEFAULT_VOCABULARY),
        }
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| self.log.then(AppDirs::default_log_path).flatten())
    }

    fn session(&self) -> anyhow::Result<Session> {
        let config = self.game_config()?;
        let vocabulary = self.vocabulary()?;
        Ok(match self.seed {
            Some(seed) => Session::with_seed(config, vocabulary, seed),
            None => Session::new(config, vocabulary),
        })
    }
}

/// Debug by default; RUST_LOG=trace adds timer firings and ignored commands
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("debug"))
}

/// The terminal belongs to the TUI, so logs only ever go to a file
fn init_logging(path: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .try_init()
        .map_err(|e| anyhow!("installing logger: {e}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_path())?;
    let session = cli.session()?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = start_tui(&mut terminal, &mut app);
    app.session.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let mut runner = Runner::new(
        TerminalEvents,
        WallClock::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let step = runner.step().context("reading terminal events")?;
        if app.on_step(step) == Control::Quit {
            break;
        }
    }

    Ok(())
}
