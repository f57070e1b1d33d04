use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use spello::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    pack::{BundledProvider, FileProvider, PackError, PackProvider, WordPack},
    picker::RandomPicker,
    runtime::{spawn_pack_loader, AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner},
    session::Session,
    TICK_RATE_MS,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

/// vocabulary spelling game with word packs
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A vocabulary spelling game: type the word that is shown, work through every word of a pack, then start the pack over."
)]
pub struct Cli {
    /// JSON file holding an array of word packs, used instead of the bundled packs
    #[clap(short = 'p', long)]
    packs: Option<PathBuf>,

    /// id of the pack to start with (defaults to the first pack)
    #[clap(short = 'k', long = "pack")]
    pack: Option<u32>,

    /// milliseconds to wait after a correct answer, clamped to 1000-1500
    #[clap(short = 'd', long)]
    delay_ms: Option<u64>,

    /// seed for the word picker, for reproducible sessions
    #[clap(long)]
    seed: Option<u64>,

    /// print the available word packs and exit
    #[clap(long)]
    list_packs: bool,
}

impl Cli {
    fn to_config(&self, stored: Config) -> Config {
        stored.with_overrides(self.delay_ms, self.packs.clone())
    }

    fn session(&self) -> Session {
        let picker = match self.seed {
            Some(seed) => RandomPicker::seeded(seed),
            None => RandomPicker::new(),
        };
        Session::new(Box::new(picker))
    }
}

fn provider_for(config: &Config) -> Box<dyn PackProvider> {
    match &config.packs_file {
        Some(path) => Box::new(FileProvider::new(path)),
        None => Box::new(BundledProvider),
    }
}

fn format_pack_list(packs: &[WordPack]) -> String {
    packs
        .iter()
        .map(|p| format!("{}\t{}\t{} words", p.id, p.name, p.words.len()))
        .join("\n")
}

fn list_packs(config: &Config) -> Result<(), PackError> {
    let packs = provider_for(config).fetch_packs()?;
    if !packs.is_empty() {
        println!("{}", format_pack_list(&packs));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.to_config(FileConfigStore::new().load());

    if cli.list_packs {
        if let Err(err) = list_packs(&config) {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, err.to_string()).exit();
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        logging::init(&path);
    }
    tracing::info!(delay_ms = config.advance_delay().as_millis() as u64, "starting spello");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli.session(), config.advance_delay()).with_preferred_pack(cli.pack);
    let result = start_tui(&mut terminal, &mut app, provider_for(&config));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    provider: Box<dyn PackProvider>,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    spawn_pack_loader(provider, events.sender());
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    terminal.hide_cursor()?;
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            event => {
                if app.handle_event(event, Instant::now()) == Control::Quit {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
