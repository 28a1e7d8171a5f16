use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
};

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

use glance::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    generation::select_generator,
    logging,
    results::ResultHistory,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    scheduler::{Clock, SystemClock},
    stimulus::{LanguagePack, SupportedLanguage},
    store::{KeyValueStore, MemoryStore, SqliteStore},
};

/// speed reading trainer: flash drills, peripheral grids, schulte tables, rsvp and comprehension tests
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal speed reading trainer. Practise with flashed words, letter grids, Schulte tables, view-field spans, RSVP playback and column reading, and track progress with timed comprehension tests."
)]
pub struct Cli {
    /// language of the bundled word lists and sample texts
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// reader age, used to pitch generated texts (5-120)
    #[clap(short = 'a', long)]
    age: Option<u8>,

    /// starting speed for rsvp playback, words per minute
    #[clap(short = 'w', long)]
    wpm: Option<u32>,

    /// read this file in the rsvp, wall and column exercises
    #[clap(short = 't', long)]
    text_file: Option<PathBuf>,

    /// external command producing texts and tests as json on stdout
    #[clap(short = 'g', long)]
    generator_cmd: Option<String>,

    /// results database (default: ~/.local/state/glance/glance.db)
    #[clap(long)]
    db: Option<PathBuf>,

    /// config file (default: platform config dir)
    #[clap(long)]
    config: Option<PathBuf>,

    /// print the stored test history as csv and exit
    #[clap(long)]
    export_history: bool,
}

fn db_path(cli: &Cli) -> PathBuf {
    cli.db
        .clone()
        .or_else(AppDirs::db_path)
        .unwrap_or_else(|| PathBuf::from("glance.db"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        logging::init(&path);
    }

    if cli.export_history {
        let store = SqliteStore::open(db_path(&cli))?;
        ResultHistory::load(&store).export_csv(io::stdout().lock())?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let mut config = config_store.load();
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(wpm) = cli.wpm {
        config.rsvp_wpm = wpm;
    }
    if let Some(cmd) = &cli.generator_cmd {
        config.generator_cmd = Some(cmd.clone());
    }

    let pack = LanguagePack::load(config.language)?;
    let generator = select_generator(config.generator_cmd.as_deref(), pack.clone(), config.language);

    let db = db_path(&cli);
    let store: Box<dyn KeyValueStore> = match SqliteStore::open(&db) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(path = %db.display(), error = %e, "results will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let mut app = App::new(pack, config, store, generator);
    if let Some(path) = &cli.text_file {
        app = app.with_custom_text(fs::read_to_string(path)?);
    }
    if let Some(age) = cli.age {
        app.set_age(age);
    }
    tracing::info!(language = %app.pack().name, age = app.age(), "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.sync_config();
    if let Err(e) = config_store.save(app.config()) {
        tracing::warn!(path = %config_store.path().display(), error = %e, "could not save config");
    }
    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let clock = SystemClock::new();
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    app.on_tick(clock.now_ms());
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        match runner.step() {
            AppEvent::Key(key) => {
                let now = clock.now_ms();
                app.on_key(key, now);
                app.on_tick(now);
            }
            AppEvent::Tick => app.on_tick(clock.now_ms()),
            AppEvent::Resize => {}
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
