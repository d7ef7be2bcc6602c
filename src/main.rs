use appdeck::{
    app::{App, TICK_RATE_MS},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    query::{FreeFilter, ListQuery, SortMode},
    runtime::{EventSource, Runner, TerminalEventSource, UiEvent},
    store::{AppStore, FileAppStore},
    theme::Theme,
    transfer::{self, Format},
    ui,
    ui::dialog::CLEAR_PROMPT,
};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
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
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, BufRead, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

/// terminal directory of apps: filter, sort, page, import and export
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Keeps a local list of apps and browses it as a filterable, sortable, paginated table. Import a JSON array, export CSV, or add entries through a validated form."
)]
pub struct Cli {
    /// app list file to use instead of the one in the data directory
    #[clap(long, global = true)]
    data_file: Option<PathBuf>,

    /// config file to use instead of the one in the config directory
    #[clap(long, global = true)]
    config_file: Option<PathBuf>,

    /// rows per page for this session
    #[clap(long)]
    page_size: Option<usize>,

    /// skip loading placeholders and transitions
    #[clap(long)]
    reduced_motion: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// print the filtered, sorted page of apps
    List {
        /// text to match against name or company
        #[clap(short = 'q', long)]
        query: Option<String>,

        /// exact domain to keep
        #[clap(long)]
        domain: Option<String>,

        /// keep only Free or Paid apps
        #[clap(long, value_enum)]
        free: Option<FreeFilter>,

        #[clap(long, value_enum, default_value_t = SortMode::CreatedDesc)]
        sort: SortMode,

        #[clap(long, default_value_t = 1)]
        page: usize,

        #[clap(long)]
        page_size: Option<usize>,
    },
    /// replace the stored list with a .json array or an exported .csv file
    Import { file: PathBuf },
    /// write the stored list to a file
    Export {
        file: PathBuf,

        /// defaults to the file extension
        #[clap(long, value_enum)]
        format: Option<Format>,
    },
    /// delete every stored app
    Clear {
        /// do not ask for confirmation
        #[clap(long)]
        yes: bool,
    },
    /// show or change the theme
    Theme {
        #[clap(value_enum)]
        mode: Option<ThemeArg>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

impl Cli {
    fn app_store(&self) -> FileAppStore {
        self.data_file
            .as_ref()
            .map(FileAppStore::with_path)
            .unwrap_or_default()
    }

    fn config_store(&self) -> FileConfigStore {
        self.config_file
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }
}

const DEFAULT_LOG_LEVEL: &str = "info";

/// `APPDECK_LOG` directives, or `info` when unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn init_logging(log_file: Option<&Path>) {
    let filter = log_filter(std::env::var("APPDECK_LOG").ok().as_deref());

    let file = log_file.and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        // never write logs onto the terminal the TUI owns
        None if log_file.is_some() => {}
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command.clone() {
        Some(command) => {
            init_logging(None);
            run_command(&cli, command, &mut io::stdout())
        }
        None => {
            init_logging(Some(&AppDirs::log_path()));
            run_tui(&cli)
        }
    }
}

fn run_tui(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = cli.config_store();
    let mut config = config_store.load();
    if let Some(size) = cli.page_size {
        config.page_size = size.max(1);
    }
    if cli.reduced_motion {
        config.reduced_motion = true;
    }
    let mut app = App::with_config(
        Box::new(cli.app_store()),
        Box::new(config_store),
        config,
        Instant::now(),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        TerminalEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f, Instant::now()))?;

    while !app.should_quit {
        let redraw = match runner.step() {
            UiEvent::Tick => app.on_tick(Instant::now()),
            UiEvent::Resize => true,
            UiEvent::Key(key) => {
                app.handle_key(key, Instant::now());
                true
            }
        };
        if redraw {
            terminal.draw(|f| ui::draw(app, f, Instant::now()))?;
        }
    }

    Ok(())
}

fn run_command(cli: &Cli, command: Command, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let store = cli.app_store();

    match command {
        Command::List {
            query,
            domain,
            free,
            sort,
            page,
            page_size,
        } => {
            let config = cli.config_store().load();
            let mut q = ListQuery {
                sort,
                page_size: page_size.or(cli.page_size).unwrap_or(config.page_size).max(1),
                ..ListQuery::default()
            };
            q.set_q(query.as_deref().unwrap_or_default());
            q.set_domain(domain.as_deref().unwrap_or_default());
            q.set_free(free.unwrap_or_default());
            q.page = page.max(1);

            let list = store.load();
            let filtered = q.apply_filters(&list);
            writeln!(out, "Results: {}", filtered.len())?;
            for app in q.paginate(&filtered) {
                writeln!(
                    out,
                    "{}  {}  {}  {}  {}",
                    pad(&app.app_name, 20),
                    pad(&app.company, 16),
                    pad(&app.domain, 14),
                    pad(&app.is_free.to_string(), 4),
                    app.created_at
                )?;
            }
        }
        Command::Import { file } => {
            let list = transfer::import_file(&file).map_err(|e| format!("Import failed: {e}"))?;
            store.save(&list)?;
            writeln!(out, "Import completed ({} apps)", list.len())?;
        }
        Command::Export { file, format } => {
            let format = format.unwrap_or_else(|| Format::from_path(&file));
            let list = store.load();
            transfer::export_file(&list, &file, format)?;
            writeln!(out, "Exported {} apps to {}", list.len(), file.display())?;
        }
        Command::Clear { yes } => {
            if !yes && !confirm(CLEAR_PROMPT)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            store.clear()?;
            writeln!(out, "Data cleared")?;
        }
        Command::Theme { mode } => {
            let config_store = cli.config_store();
            let mut config = config_store.load();
            if let Some(mode) = mode {
                config.theme = match mode {
                    ThemeArg::Dark => Theme::Dark,
                    ThemeArg::Light => Theme::Light,
                    ThemeArg::Toggle => config.theme.toggled(),
                };
                config_store.save(&config)?;
                tracing::info!(theme = %config.theme, "theme changed");
            }
            writeln!(out, "{}", config.theme)?;
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Left-aligns `s` in `width` columns, truncating long values
fn pad(s: &str, width: usize) -> String {
    let shown = ui::fit(s, width);
    let fill = width.saturating_sub(shown.width());
    format!("{shown}{}", " ".repeat(fill))
}
