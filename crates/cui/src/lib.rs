mod actions;
mod app;
mod input;
mod persistence;
mod telemetry;
mod view;

use anyhow::{Context, Result};
use app::{App, AppSettings, DEFAULT_RUN_SEED};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use persistence::default_save_path;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_ASSETS_DIR: &str = "assets";

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub assets: Option<PathBuf>,
    pub seed: Option<u64>,
    pub target: Option<String>,
    pub save_path: Option<PathBuf>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let log_path = telemetry::init_tracing()?;
    let save_path = options
        .save_path
        .or_else(default_save_path)
        .context("no save location: set HOME or CROPMATCH_SAVE, or pass --save")?;
    let settings = AppSettings {
        assets: options
            .assets
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
        save_path,
        target: options.target,
        seed: options.seed.unwrap_or_else(clock_seed),
    };
    tracing::info!(
        assets = %settings.assets.display(),
        save = %settings.save_path.display(),
        log = %log_path.display(),
        seed = settings.seed,
        "starting"
    );
    let mut app = App::bootstrap(&settings)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    tracing::info!("stopped");
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--target" => {
                if let Some(value) = args.get(idx + 1) {
                    options.target = Some(value.clone());
                    idx += 1;
                }
            }
            "--save" => {
                if let Some(value) = args.get(idx + 1) {
                    options.save_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(DEFAULT_RUN_SEED)
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let poll_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(poll_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = input::map_key(key);
                    actions::dispatch(app, action);
                }
            }
        }
        let now = Instant::now();
        app.on_tick(now.duration_since(last_tick).as_secs_f32());
        last_tick = now;
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "cropmatch requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
