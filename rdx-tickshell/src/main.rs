use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tickdeck::backup;
use tickdeck::config::LoggingConfig;
use tickdeck::keys;
use tickdeck::prelude::*;
use tickdeck::screen::TerminalScreen;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tickdeck", version, about = "Terminal clock, animator, dashboard and backup tool")]
struct Cli {
    /// Configuration file (defaults to ./tickdeck.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Big-digit clock with stopwatch and prayer times.
    Clock {
        /// Mode shown first: clock, stopwatch or prayer.
        #[arg(long)]
        mode: Option<Mode>,
        /// Redraw interval in milliseconds.
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Scrolling text or a countdown.
    Animate {
        #[arg(long, value_enum, default_value_t = AnimateMode::Scroll)]
        mode: AnimateMode,
        /// Text to scroll across the terminal.
        #[arg(long)]
        text: Option<String>,
        /// Columns the text scrolls across.
        #[arg(long)]
        width: Option<usize>,
        /// Countdown duration in seconds.
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Copy a directory into a timestamped backup folder.
    Backup {
        /// Source directory to back up.
        #[arg(long)]
        src: PathBuf,
        /// Destination base directory for backups.
        #[arg(long)]
        dst: PathBuf,
    },
    /// Live CPU and memory dashboard.
    Dashboard {
        /// Seconds between samples.
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Command {
    /// Whether the subcommand draws a live screen on the terminal.
    fn owns_terminal(&self) -> bool {
        !matches!(self, Command::Backup { .. })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AnimateMode {
    Scroll,
    Countdown,
}

/// Where log lines are written.
#[derive(Debug, PartialEq)]
enum LogTarget {
    File(PathBuf),
    Stderr,
    /// Nothing may be written to a terminal the render loop is drawing on.
    Discard,
}

fn log_target(logging: &LoggingConfig, owns_terminal: bool) -> LogTarget {
    match &logging.file {
        Some(path) => LogTarget::File(path.clone()),
        None if owns_terminal => LogTarget::Discard,
        None => LogTarget::Stderr,
    }
}

fn init_tracing(logging: &LoggingConfig, target: LogTarget) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("invalid log level '{}'", logging.level))?,
    };
    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::Discard => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

async fn run_engine(mut engine: RenderEngine) -> Result<ExitReason> {
    let (keys, raw_mode) = keys::default_source();
    let mut screen = TerminalScreen::stdout(raw_mode);
    engine.run(&mut screen, keys).await
}

fn run_backup(src: PathBuf, dst: PathBuf) -> Result<()> {
    println!("Backing up {} → {} ...", src.display(), dst.display());
    let (dst_dir, result) =
        backup::backup_dir_with_timestamp(&src, &dst).context("Backup failed")?;

    println!("\n{}", "✅ Backup complete!".green().bold());
    println!("   Destination: {}", dst_dir.display());
    println!("   Files copied: {}", result.files_copied);
    println!("   Dirs created: {}", result.dirs_created);
    println!("   Bytes copied: {}", result.bytes_copied);

    if !result.errors.is_empty() {
        println!("\n{}", format!("⚠️  Errors ({}):", result.errors.len()).yellow());
        for e in &result.errors {
            println!("   - {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TickdeckConfig::load(cli.config.as_deref())?;
    let target = log_target(&config.logging, cli.command.owns_terminal());
    init_tracing(&config.logging, target)?;
    info!("{} v{} starting", tickdeck::TOOLKIT_NAME, tickdeck::VERSION);

    match cli.command {
        Command::Clock { mode, tick_ms } => {
            let tick = match tick_ms {
                Some(ms) => Duration::from_millis(ms.max(1)),
                None => config.clock.tick_interval(),
            };
            let engine = RenderEngine::new(tick)
                .with_view(ClockView::new())
                .with_view(StopwatchView::new())
                .with_view(PrayerView::from_config(&config)?)
                .initial_mode(mode.unwrap_or(config.clock.initial_mode));
            run_engine(engine).await?;
            println!("{}", "Goodbye!".cyan());
        }
        Command::Animate { mode, text, width, seconds } => {
            let animate = &config.animate;
            let engine = match mode {
                AnimateMode::Scroll => {
                    let text = text.unwrap_or_else(|| animate.text.clone());
                    let width = width.unwrap_or(animate.width);
                    RenderEngine::new(Duration::from_millis(animate.scroll_ms.max(1)))
                        .with_view(ScrollView::new(text, width))
                }
                AnimateMode::Countdown => RenderEngine::new(Duration::from_secs(1))
                    .with_view(CountdownView::new(seconds.unwrap_or(animate.seconds))),
            };
            match run_engine(engine).await? {
                ExitReason::Finished => println!("{}", "🎉 Time's up!".green()),
                ExitReason::Interrupted => println!("Cancelled!"),
                ExitReason::Quit => println!("Goodbye!"),
            }
        }
        Command::Backup { src, dst } => run_backup(src, dst)?,
        Command::Dashboard { interval } => {
            let secs = interval.unwrap_or(config.dashboard.refresh_secs).max(1);
            let engine =
                RenderEngine::new(Duration::from_secs(secs)).with_view(DashboardView::new());
            run_engine(engine).await?;
            println!("{}", "Goodbye!".cyan());
        }
    }
    Ok(())
}
