//! pomo - Pomodoro cycle timer for the terminal
//!
//! Usage:
//!   pomo                        Run the timer with the configured cycle
//!   pomo --preset deep          Run with the deep work preset
//!   pomo --work 1800 --cycles 3 Override individual values (seconds)
//!   pomo config                 Print the effective configuration
//!   pomo presets                List the built-in presets

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomo_core::{seconds_to_time, ConfigOverrides, CycleConfig, Paths, Preset};
use ratatui::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use pomo::{ui, App};

/// Longest the loop blocks on input before redrawing
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// pomo - Pomodoro cycle timer for the terminal
#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "Pomodoro cycle timer: work, short rests and long rests")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Keep a steady work/rest rhythm. Work stages alternate with short
    rests; every few work stages the rest is a long one.

PRESETS:
    pomodoro    25 min work, 5 min rest, 15 min long rest every 4 (default)
    deep        90 min work, 20 min rest, 30 min long rest every 2
    quick       15 min work, 3 min rest, 10 min long rest every 4

EXAMPLES:
    pomo                        # Default pomodoro cycle
    pomo --preset quick         # Quick sprints
    pomo --work 3000 --cycles 3 # 50 minute work stages
    pomo config                 # Show what would run

KEY BINDINGS:
    s           Start a work stage
    r           Take a long rest now
    p, Space    Pause/resume
    ?           Toggle help overlay
    q, Esc      Quit

CONFIG:
    Optional JSON at ~/.config/pomo/config.json, e.g.
    { "preset": "deep", "long_rest": 2400 }
    Command line flags override the file. Set RUST_LOG to control logging.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    cycle: CycleArgs,

    /// Config file (default: ~/.config/pomo/config.json)
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Log file (default: ~/.local/share/pomo/pomo.log)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CycleArgs {
    /// Base preset: pomodoro, deep or quick
    #[arg(long, global = true)]
    preset: Option<Preset>,

    /// Work stage duration in seconds
    #[arg(short, long, global = true, value_name = "SECS")]
    work: Option<u32>,

    /// Short rest duration in seconds
    #[arg(short, long, global = true, value_name = "SECS")]
    short_rest: Option<u32>,

    /// Long rest duration in seconds
    #[arg(short, long, global = true, value_name = "SECS")]
    long_rest: Option<u32>,

    /// Work stages per long rest
    #[arg(short, long, global = true, value_name = "N")]
    cycles: Option<u32>,
}

impl From<CycleArgs> for ConfigOverrides {
    fn from(args: CycleArgs) -> Self {
        Self {
            preset: args.preset,
            work: args.work,
            short_rest: args.short_rest,
            long_rest: args.long_rest,
            cycles: args.cycles,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer (default)
    Run,

    /// Print the effective configuration as JSON
    Config,

    /// List the built-in presets
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli, &Paths::new())
}

fn run(cli: Cli, paths: &Paths) -> Result<()> {
    match cli.command {
        Some(Commands::Presets) => cmd_presets(),
        Some(Commands::Config) => {
            let config = resolve_config(cli.config_file.as_deref(), cli.cycle, paths)?;
            cmd_config(&config)
        }
        Some(Commands::Run) | None => {
            let config = resolve_config(cli.config_file.as_deref(), cli.cycle, paths)?;
            let log_file = cli.log_file.unwrap_or_else(|| paths.log_file());
            start_logging(&log_file);
            cmd_run(config)
        }
    }
}

/// Layer the command line flags over the config file and validate the result
fn resolve_config(file: Option<&Path>, args: CycleArgs, paths: &Paths) -> Result<CycleConfig> {
    let path = file.map_or_else(|| paths.config_file(), Path::to_path_buf);
    let overrides = ConfigOverrides::load(&path)?;
    Ok(overrides.merge(args.into()).resolve()?)
}

/// Log to `path` when it can be opened. The timer runs without logs otherwise.
fn start_logging(path: &Path) -> bool {
    match init_logging(path) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            false
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let dir = parent.display();
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {dir}"))?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    // The terminal belongs to the dashboard, so logs go to the file
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to set log subscriber: {err}"))
}

fn cmd_config(config: &CycleConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)
        .context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}

fn cmd_presets() -> Result<()> {
    for preset in Preset::all() {
        let config = preset.config();
        println!(
            "{:<10} work {:>5}  rest {:>5}  long rest {:>5}  every {}  - {}",
            preset.as_str(),
            seconds_to_time(config.work() as f64),
            seconds_to_time(config.short_rest() as f64),
            seconds_to_time(config.long_rest() as f64),
            config.cycles(),
            preset.description()
        );
    }
    Ok(())
}

fn cmd_run(config: CycleConfig) -> Result<()> {
    tracing::info!(
        "Starting pomo (work {}s, short rest {}s, long rest {}s, {} cycles)",
        config.work(),
        config.short_rest(),
        config.long_rest(),
        config.cycles()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Instant::now());
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    tracing::info!(
        "Exiting after {} pomodoros, {} worked",
        app.controller.completed_pomodoros(),
        seconds_to_time(app.controller.worked_seconds() as f64)
    );

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = app
            .scheduler
            .timeout(Instant::now())
            .map_or(REDRAW_INTERVAL, |t| t.min(REDRAW_INTERVAL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code, Instant::now());
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let area = terminal.get_frame().area();
                    if let Some(control) = ui::control_at(area, mouse.column, mouse.row) {
                        app.activate(control, Instant::now());
                    }
                }
                _ => {}
            }
        }

        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
