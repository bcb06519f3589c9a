//! rategate - eligibility gate for in-app store review prompts
//!
//! CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use rategate::cli::ask::{AskCommand, AskOptions};
use rategate::cli::clear::{ClearCommand, ClearOptions};
use rategate::cli::happiness::{HappinessAction, HappinessCommand, HappinessOptions};
use rategate::cli::launch::{LaunchCommand, LaunchOptions};
use rategate::cli::status::{StatusCommand, StatusOptions};
use rategate::config::Config;
use rategate::core::ReviewEngine;
use rategate::error::exit_codes;
use rategate::host::{
    init_tracing, AppVersion, Clock, CommandPrompt, EnvVersion, ManualClock, PromptRequester,
    StaticVersion, StderrPrompt, SystemClock, TracingLogger, VersionProvider,
};
use rategate::storage::FileCounterStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// rategate - decide when to ask for an app store review
#[derive(Parser)]
#[command(name = "rategate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// State file (default: ~/.rategate/state.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Running app version (default: $RATEGATE_APP_VERSION)
    #[arg(long, global = true)]
    app_version: Option<String>,

    /// Running app build number (with --app-version)
    #[arg(long, global = true)]
    app_build: Option<String>,

    /// Evaluate at this RFC 3339 instant instead of the wall clock
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Copy, Default)]
struct OutputArgs {
    /// Output as JSON
    #[arg(long, short)]
    json: bool,
    /// Suppress output
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an app launch
    Launch {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show stored counters and the current decision
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Record a happy moment
    Happy {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Record an unhappy moment
    Unhappy {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Set the happiness index back to zero
    ResetHappiness {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ask for a review if eligible
    Ask {
        /// Skip the time, annual-cap and happiness gates
        #[arg(long)]
        force: bool,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Erase all stored review data
    Clear {
        /// Confirm the erase
        #[arg(long)]
        yes: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", value, e))
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("rategate error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "rategate=info" } else { "warn" });

    let engine = build_engine(&cli)?;

    let success = match cli.command {
        Commands::Launch { output } => {
            let cmd = LaunchCommand::new(&engine);
            let options = LaunchOptions {
                json: output.json,
                quiet: output.quiet,
            };
            let result = cmd.run(&options);
            emit(&cmd.format_output(&result, &options));
            result.success
        }
        Commands::Status { output } => {
            let cmd = StatusCommand::new(&engine);
            let options = StatusOptions {
                json: output.json,
                quiet: output.quiet,
            };
            let result = cmd.run(&options);
            emit(&cmd.format_output(&result, &options));
            result.success
        }
        Commands::Happy { output } => run_happiness(&engine, HappinessAction::Increment, output),
        Commands::Unhappy { output } => {
            run_happiness(&engine, HappinessAction::Decrement, output)
        }
        Commands::ResetHappiness { output } => {
            run_happiness(&engine, HappinessAction::Reset, output)
        }
        Commands::Ask { force, output } => {
            let cmd = AskCommand::new(&engine);
            let options = AskOptions {
                json: output.json,
                quiet: output.quiet,
                force,
            };
            let result = cmd.run(&options);
            emit(&cmd.format_output(&result, &options));
            result.success
        }
        Commands::Clear { yes, output } => {
            let cmd = ClearCommand::new(&engine);
            let options = ClearOptions {
                json: output.json,
                quiet: output.quiet,
                yes,
            };
            let result = cmd.run(&options);
            emit(&cmd.format_output(&result, &options));
            result.success
        }
    };

    Ok(success_to_exit_code(success))
}

/// Assemble the engine from config, global flags and the state file.
fn build_engine(cli: &Cli) -> Result<ReviewEngine<FileCounterStore>, Box<dyn std::error::Error>> {
    let config = Config::load();

    let store = match &cli.state {
        Some(path) => FileCounterStore::with_path(path)?,
        None => FileCounterStore::new()?,
    };

    let prompt: Arc<dyn PromptRequester> = match config.ask.prompt_command.as_deref() {
        Some(command) if !command.trim().is_empty() => Arc::new(CommandPrompt::new(command)),
        _ => Arc::new(StderrPrompt),
    };

    let version: Arc<dyn VersionProvider> = match &cli.app_version {
        Some(release) => {
            let mut version = AppVersion::new(release.as_str());
            if let Some(build) = &cli.app_build {
                version = version.with_build(build.as_str());
            }
            Arc::new(StaticVersion::new(version))
        }
        None => Arc::new(EnvVersion),
    };

    let clock: Arc<dyn Clock> = match cli.now {
        Some(now) => Arc::new(ManualClock::new(now)),
        None => Arc::new(SystemClock),
    };

    let mut engine = ReviewEngine::new(store, config, prompt)
        .with_version_provider(version)
        .with_clock(clock);
    if cli.verbose {
        engine = engine.with_logger(TracingLogger);
    }

    Ok(engine)
}

fn run_happiness(
    engine: &ReviewEngine<FileCounterStore>,
    action: HappinessAction,
    output: OutputArgs,
) -> bool {
    let cmd = HappinessCommand::new(engine);
    let options = HappinessOptions {
        json: output.json,
        quiet: output.quiet,
    };
    let result = cmd.run(action, &options);
    emit(&cmd.format_output(&result, &options));
    result.success
}

fn emit(formatted: &str) {
    if !formatted.is_empty() {
        print!("{}", formatted);
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

// =============================================================================
// Tests
// =============================================================================
