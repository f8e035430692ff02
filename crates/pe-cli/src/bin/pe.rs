//! Pure-call evaluator CLI
//!
//! # Usage
//!
//! ```bash
//! # Evaluate strings.ToLower("HELLO WORLD") ahead of time
//! pe eval -m strings -f ToLower -p s:string -r string -a '"HELLO WORLD"'
//!
//! # Show the caller program that would be run
//! pe synth -m example.com/m/calc -f addPure -p a:int -p b:int -r int -a 10 -a 20
//!
//! # Ask whether a call qualifies, with `x` as a runtime variable
//! pe check -m example.com/m/calc -f addPure -p a:int -p b:int -r int -a x -a 20
//!
//! # Describe the call in a JSON document instead
//! pe eval --call call.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use pe_cli::{
    commands::{self, check::CheckArgs, eval::EvalArgs, synth::SynthArgs},
    config::CliConfig,
    diagnostics::setup_error_reporting,
    Result,
};
use pe_eval::RecursionGuard;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pe",
    version = env!("CARGO_PKG_VERSION"),
    about = "Evaluate calls to pure Go functions ahead of time",
    long_about = r#"
Runs a call to a pure Go function with constant arguments in a throwaway
`go run` program and reports the constant it produces.

EXAMPLES:
    pe eval -m strings -f ToLower -p s:string -r string -a '"HELLO"'
    pe synth --call call.json
    pe check --call call.json
    "#
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a call and print the constant it produces
    Eval(EvalArgs),

    /// Print the caller program synthesized for a call
    Synth(SynthArgs),

    /// Report whether a call is eligible for evaluation
    Check(CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_error_reporting()?;
    setup_logging(cli.verbose, cli.quiet, cli.log, cli.log_format)?;

    // Read once; everything below receives it explicitly.
    let guard = RecursionGuard::from_env();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.evaluator.verbosity = config.evaluator.verbosity.max(cli.verbose);
    console::set_colors_enabled(config.output.color);

    let result = match cli.command {
        Commands::Eval(args) => commands::eval_command(args, &config, guard),
        Commands::Synth(args) => commands::synth_command(args, &config),
        Commands::Check(args) => commands::check_command(args, &config),
    };

    match result {
        Ok(_) => {
            if cli.verbose > 0 {
                info!("Command completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            use tracing::error;
            if !pe_cli::diagnostics::render_cli_error(&e) {
                error!("{}", e);
            }
            if cli.verbose > 0 {
                error!(?e, "detailed error context");
            }
            std::process::exit(1);
        }
    }
}

fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_level: Option<LogLevel>,
    log_format: LogFormat,
) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
