use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};
use tracing::{info, warn};
use tradle::{
    app::Control,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    country::Catalog,
    game::discard_session,
    logging::init_tracing,
    runtime::{EventLoop, GameEvent},
    storage::{KeyValueStore, MemoryStore, SqliteStore},
    App, Game,
};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 100;

/// guess the country from its exports, in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess which country exports the products shown in its OEC tree map. Each wrong guess tells you how far away and in which direction the answer lies. Six tries."
)]
pub struct Cli {
    /// keep the exports visualization hidden until you ask for it
    #[clap(long)]
    hide_image: bool,

    /// play in rotation mode
    #[clap(long)]
    rotation: bool,

    /// discard the game in progress and start a new one
    #[clap(short = 'n', long)]
    new: bool,

    /// seed for picking the country to guess
    #[clap(long)]
    seed: Option<u64>,

    /// directory holding the game state and log file
    #[clap(long)]
    state_dir: Option<PathBuf>,

    /// store the display settings given on the command line as defaults
    #[clap(long)]
    save_settings: bool,
}

impl Cli {
    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        }
    }
}

/// Persistent store under the state dir, or an in-memory one if it can't be opened
fn open_store(state_dir: Option<&Path>) -> Rc<dyn KeyValueStore> {
    match AppDirs::db_path(state_dir).map(SqliteStore::open) {
        Some(Ok(store)) => Rc::new(store),
        Some(Err(e)) => {
            warn!(error = %e, "state database unavailable, progress will not be saved");
            Rc::new(MemoryStore::new())
        }
        None => Rc::new(MemoryStore::new()),
    }
}

fn build_app(cli: &Cli, config_store: &dyn ConfigStore) -> Result<App, Box<dyn Error>> {
    let config = config_store
        .load()
        .with_overrides(cli.hide_image, cli.rotation);
    if cli.save_settings {
        config_store.save(&config)?;
    }

    let store = open_store(cli.state_dir.as_deref());
    if cli.new {
        discard_session(&*store)?;
    }

    let game = Game::new(Catalog::embedded()?, store, cli.rng())?;
    info!(guesses = game.guesses().len(), state = %game.state(), "game loaded");

    Ok(App::new(game, config))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path(cli.state_dir.as_deref()) {
        // logging is best effort; the game works without it
        if let Err(e) = init_tracing(&log_path) {
            eprintln!("tradle: logging disabled, cannot open {}: {e}", log_path.display());
        }
    }

    let mut app = build_app(&cli, &FileConfigStore::new())?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let events = EventLoop::from_terminal(Duration::from_millis(TICK_RATE_MS));

    loop {
        terminal.draw(|f| ui(app, f))?;

        match events.next() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Redraw => {}
            GameEvent::Closed => break,
            GameEvent::Action(action) => match app.handle_action(action) {
                Control::Continue => {}
                Control::Open(url) => {
                    if Browser::is_available() {
                        webbrowser::open(&url).unwrap_or_default();
                    }
                }
                Control::Quit => break,
            },
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
