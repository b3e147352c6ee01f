//! CLI entry point for node-cleaner.
//!
//! This binary finds every `node_modules` directory under a path and deletes
//! them with a bounded pool of worker threads.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode: prompts for path, mode and worker count
//! node-cleaner
//!
//! # Preview what would be deleted
//! node-cleaner --path ~/projects --dry-run
//!
//! # Delete with 8 workers, skipping confirmation
//! node-cleaner --path ~/projects --workers 8 --yes
//!
//! # Machine-readable result
//! node-cleaner --path ~/projects --dry-run --yes --json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod notify;
mod prompt;
mod report;

use std::io::{self, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::WrapErr;
use nc_core::{ScanConfiguration, Settings};
use nc_scanner::Cleaner;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::notify::{TITLE, completion_message, platform_notifier};
use crate::prompt::{InteractiveChoices, Prompter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Find and delete all `node_modules` directories under a path.
///
/// Run without arguments for interactive mode.
#[derive(Parser, Debug)]
#[command(name = "node-cleaner", version, about, long_about = None)]
struct Cli {
    /// Root directory to scan.
    #[arg(short, long, env = "NODE_CLEANER_PATH", default_value = ".")]
    path: Utf8PathBuf,

    /// Number of deletion workers (defaults to the number of CPU cores).
    #[arg(short, long, env = "NODE_CLEANER_WORKERS")]
    workers: Option<usize>,

    /// Only show what would be deleted, don't actually delete.
    #[arg(long)]
    dry_run: bool,

    /// Additional directory name to skip (repeatable).
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,

    /// JSON settings file providing defaults for the options above.
    #[arg(long, value_name = "FILE", env = "NODE_CLEANER_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,

    /// Print the final result as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Do not show the completion notification.
    #[arg(long)]
    no_notify: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Effective options after merging the settings file, flags and menu.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunOptions {
    path: Utf8PathBuf,
    workers: usize,
    dry_run: bool,
    skip_dirs: Vec<String>,
    notify: bool,
    assume_yes: bool,
    json: bool,
}

impl RunOptions {
    /// Flags win over the settings file; CPU count is the last fallback.
    fn resolve(cli: &Cli, settings: &Settings, cpus: usize) -> Self {
        let mut skip_dirs = settings.skip_dirs.clone();
        skip_dirs.extend(cli.skip.iter().cloned());

        Self {
            path: cli.path.clone(),
            workers: cli.workers.or(settings.workers).unwrap_or(cpus),
            dry_run: cli.dry_run || settings.dry_run,
            skip_dirs,
            notify: !cli.no_notify && settings.notify,
            assume_yes: cli.yes,
            json: cli.json,
        }
    }

    /// Replaces path, mode and workers with the interactive answers.
    fn with_choices(mut self, choices: InteractiveChoices) -> Self {
        self.path = choices.path;
        self.dry_run = choices.dry_run;
        self.workers = choices.workers;
        self
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Logs go to stderr so stdout carries only prompts and the report.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

/// Loads the settings file, or defaults when none is given.
fn load_settings(path: Option<&Utf8PathBuf>) -> color_eyre::Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .wrap_err_with(|| format!("Failed to load settings from {path}")),
        None => Ok(Settings::default()),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. No arguments at all means interactive mode
    let interactive = std::env::args_os().len() <= 1;
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    let settings = load_settings(cli.config.as_ref())?;
    let cpus = num_cpus::get();

    // Prompts move to stderr in JSON mode so stdout stays parseable
    let prompt_out: Box<dyn Write> = if cli.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), prompt_out);

    // 4. Merge settings, flags and (optionally) the interactive menu
    let mut options = RunOptions::resolve(&cli, &settings, cpus);
    if interactive {
        options = options.with_choices(prompter.interactive_menu(cpus)?);
    }

    let config = ScanConfiguration::new(&options.path, options.workers, options.dry_run)?
        .with_skip_dirs(options.skip_dirs.iter().cloned());

    info!(
        path = %config.root_path(),
        workers = config.worker_count(),
        cpus,
        dry_run = config.dry_run(),
        "Configuration"
    );

    // 5. Confirm before touching anything
    if !options.assume_yes && !prompter.confirm(config.root_path(), config.dry_run())? {
        if options.json {
            writeln!(io::stderr(), "Cancelled")?;
        } else {
            writeln!(io::stdout(), "Cancelled")?;
        }
        return Ok(());
    }

    // 6. Run, with Ctrl-C winding the run down
    let cleaner = Cleaner::new(config);
    let token = cleaner.cancel_token();
    ctrlc::set_handler(move || token.cancel()).wrap_err("Failed to install Ctrl-C handler")?;

    let result = cleaner.run()?;

    // 7. Report
    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if options.json {
            writeln!(
                handle,
                "{}",
                report::render_json(cleaner.config().root_path(), &result)?
            )?;
        } else {
            write!(handle, "{}", report::render_summary(&result))?;
        }
    }

    // 8. Notify (the console notifier would corrupt JSON output)
    if options.notify && !options.json {
        let mut notifier = platform_notifier();
        if let Err(e) = notifier.notify(TITLE, completion_message(result.dry_run)) {
            warn!(error = %e, "Failed to show completion notification");
        }
    }

    if interactive {
        prompter.pause()?;
    }

    Ok(())
}
