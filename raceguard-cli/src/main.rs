//! `raceguard` — replays a recorded event trace (or runs a hard-coded demo
//! scenario) through the Djit+ analyzer and prints race reports.
//!
//! CLI parsing, logging setup, and output formatting are all ambient
//! scaffolding around `raceguard-core` and `raceguard-io` — the analyzer
//! itself has no opinion on any of them.

mod demo;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use raceguard_core::{Analyzer, Dispatcher, EventSource, RegistrationPolicy};
use raceguard_io::{load_watch_set, JsonReporter, JsonlEventSource, TextReporter};

use error::CliError;

#[derive(Parser)]
#[command(name = "raceguard", about = "Dynamic data-race detector (Djit+ vector clocks)", long_about = None)]
struct Cli {
    /// Emit debug-level logs in addition to info.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a newline-delimited JSON event trace through the analyzer.
    Replay {
        /// Path to the trace file.
        #[arg(short, long)]
        input: PathBuf,

        /// How to render violations and the final dump.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Whether unregistered accesses are silently dropped.
        #[arg(short, long, value_enum, default_value_t = PolicyArg::Lazy)]
        policy: PolicyArg,

        /// Watch-set file (required when `--policy watch-set`).
        #[arg(short, long)]
        watch_set: Option<PathBuf>,

        /// Print the final clock state after the trace is exhausted.
        #[arg(long)]
        dump: bool,
    },

    /// Run one of the six built-in worked scenarios (s1-s6).
    Demo {
        /// Scenario name, e.g. `s1`.
        scenario: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Lazy,
    WatchSet,
}

impl From<PolicyArg> for RegistrationPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Lazy => RegistrationPolicy::Lazy,
            PolicyArg::WatchSet => RegistrationPolicy::WatchSet,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Replay { input, format, policy, watch_set, dump } => {
            replay(input, format, policy.into(), watch_set, dump)
        }
        Commands::Demo { scenario } => demo::run(&scenario),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "raceguard failed");
            ExitCode::FAILURE
        }
    }
}

fn replay(
    input: PathBuf,
    format: OutputFormat,
    policy: RegistrationPolicy,
    watch_set: Option<PathBuf>,
    dump: bool,
) -> Result<(), CliError> {
    let analyzer = Arc::new(Analyzer::<String, String, String>::new(policy));

    if let Some(path) = watch_set {
        let file = std::fs::File::open(&path).map_err(|source| raceguard_io::IoError::WatchSetOpen {
            path: path.display().to_string(),
            source,
        })?;
        let (vars, locks) = load_watch_set(file, &analyzer)?;
        tracing::info!(vars, locks, path = %path.display(), "loaded watch set");
    }

    match format {
        OutputFormat::Text => run_replay(&analyzer, input, Arc::new(TextReporter::new(std::io::stdout())), dump),
        OutputFormat::Json => run_replay(&analyzer, input, Arc::new(JsonReporter::new(std::io::stdout())), dump),
    }
}

fn run_replay<R>(
    analyzer: &Arc<Analyzer<String, String, String>>,
    input: PathBuf,
    reporter: Arc<R>,
    dump: bool,
) -> Result<(), CliError>
where
    R: raceguard_core::Reporter<String, String> + 'static,
{
    let r = Arc::clone(&reporter);
    analyzer.set_read_violation_callback(move |v| r.read_violation(v));
    let r = Arc::clone(&reporter);
    analyzer.set_write_violation_callback(move |v| r.write_violation(v));

    let dispatcher = Dispatcher::new(Arc::clone(analyzer));
    let mut source = JsonlEventSource::open(&input)?;
    source.run(&dispatcher)?;

    if dump {
        reporter.dump(&analyzer.snapshot());
    }
    Ok(())
}
