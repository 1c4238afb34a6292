use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    rc::Rc,
    sync::Mutex,
    time::Duration,
};

use alphabet_typer::{
    alphabet::BuiltinAlphabet,
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    share,
    timer::{Clock, SystemClock},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;

/// how fast can you type the whole alphabet?
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A tiny typing game: after a 3 second countdown, type the alphabet as fast as you can. Pasting does not count."
)]
pub struct Cli {
    /// alphabet to type
    #[clap(short = 'a', long, value_enum)]
    alphabet: Option<BuiltinAlphabet>,

    /// type these letters instead of a built-in alphabet
    #[clap(short = 'L', long, conflicts_with = "alphabet")]
    letters: Option<String>,

    /// length of the countdown in seconds
    #[clap(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    countdown: Option<u8>,

    /// how often the running time is redrawn, in milliseconds
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    refresh_ms: Option<u64>,

    /// write logs to a file (the state directory if no path is given); filter with RUST_LOG
    #[clap(long, num_args = 0..=1, value_name = "PATH")]
    log_file: Option<Option<PathBuf>>,
}

impl Cli {
    /// Command line flags win over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(alphabet) = self.alphabet {
            config.alphabet = alphabet;
        }
        if let Some(countdown) = self.countdown {
            config.countdown = countdown;
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.refresh_ms = refresh_ms;
        }
        config.sanitized()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.as_ref())?;

    let store = FileConfigStore::new();
    let stored = store.load();
    let config = cli.apply(stored.clone());
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let mut app = match &cli.letters {
        Some(letters) => App::with_alphabet(config, letters.to_lowercase().parse()?, clock),
        None => App::new(config, clock)?,
    };
    info!(alphabet = app.alphabet().title(), "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if !app.is_custom_alphabet() && app.config().alphabet != stored.alphabet {
        let saved = Config {
            alphabet: app.config().alphabet,
            ..stored
        };
        if let Err(err) = store.save(&saved) {
            warn!(%err, path = %store.path().display(), "failed to save config");
        }
    }

    result
}

fn init_logging(log_file: Option<&Option<PathBuf>>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let path = match path {
        Some(path) => path.clone(),
        None => AppDirs::log_path().ok_or("no state directory for the log file")?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step(app.until_next_timer());
        let redraw = app.handle_event(event);

        if let Some(url) = app.take_share_request() {
            share::open(&url);
        }
        if app.should_quit() {
            break;
        }
        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphabet_typer::timer::ManualClock;
    use clap::Parser;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["alphabet-typer"]);

        assert_eq!(cli.alphabet, None);
        assert_eq!(cli.letters, None);
        assert_eq!(cli.countdown, None);
        assert_eq!(cli.refresh_ms, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_alphabet() {
        let cli = Cli::parse_from(["alphabet-typer", "-a", "greek"]);
        assert_eq!(cli.alphabet, Some(BuiltinAlphabet::Greek));

        let cli = Cli::parse_from(["alphabet-typer", "--alphabet", "english"]);
        assert_eq!(cli.alphabet, Some(BuiltinAlphabet::English));

        assert!(Cli::try_parse_from(["alphabet-typer", "-a", "klingon"]).is_err());
    }

    #[test]
    fn test_cli_letters_conflict_with_alphabet() {
        let cli = Cli::parse_from(["alphabet-typer", "-L", "qwerty"]);
        assert_eq!(cli.letters, Some("qwerty".to_string()));

        assert!(Cli::try_parse_from(["alphabet-typer", "-L", "abc", "-a", "greek"]).is_err());
    }

    #[test]
    fn test_cli_countdown_range() {
        let cli = Cli::parse_from(["alphabet-typer", "-c", "5"]);
        assert_eq!(cli.countdown, Some(5));

        assert!(Cli::try_parse_from(["alphabet-typer", "-c", "0"]).is_err());
        assert!(Cli::try_parse_from(["alphabet-typer", "-c", "10"]).is_err());
    }

    #[test]
    fn test_cli_log_file() {
        let cli = Cli::parse_from(["alphabet-typer", "--log-file"]);
        assert_eq!(cli.log_file, Some(None));

        let cli = Cli::parse_from(["alphabet-typer", "--log-file", "/tmp/typer.log"]);
        assert_eq!(cli.log_file, Some(Some(PathBuf::from("/tmp/typer.log"))));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["alphabet-typer", "-a", "english", "-c", "2", "--refresh-ms", "50"]);
        let config = cli.apply(Config::default());

        assert_eq!(config.alphabet, BuiltinAlphabet::English);
        assert_eq!(config.countdown, 2);
        assert_eq!(config.refresh_ms, 50);
        assert_eq!(config.promo_url, Config::default().promo_url);
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let stored = Config {
            alphabet: BuiltinAlphabet::Greek,
            countdown: 4,
            ..Config::default()
        };
        let cli = Cli::parse_from(["alphabet-typer"]);

        assert_eq!(cli.apply(stored.clone()), stored);
    }

    #[test]
    fn test_ui_function_renders_menu() {
        use ratatui::{backend::TestBackend, Terminal};

        let app = App::new(Config::default(), Rc::new(ManualClock::new())).unwrap();
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Russian"));
    }

    #[test]
    fn test_tick_rate_constant() {
        const _: () = assert!(TICK_RATE_MS > 0);
        const _: () = assert!(TICK_RATE_MS <= 1000);
    }
}
