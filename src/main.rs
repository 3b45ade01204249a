//! CMOS seeder entry point.

use clap::Parser;
use cmos::cli::commands;
use cmos::cli::{Cli, Commands};
use cmos::error::Error;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        cmos::QUIET.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else {
                eprintln!("❌ {}", format!("Error: {e}").red());
                if let Some(hint) = e.hint() {
                    eprintln!("  Hint: {hint}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let db = cli.db.as_deref();

    match &cli.command {
        Commands::Init { force } => commands::init::execute(db, *force, cli.json),
        Commands::SeedSprint { plan } => commands::seed::execute(db, plan.as_deref(), cli.json),
        Commands::UpdateContext(args) => commands::update::execute(db, args, cli.json),
        Commands::Snapshots { context_id, limit } => {
            commands::snapshots::execute(db, context_id, *limit, cli.json)
        }
        Commands::Status { context_id } => commands::status::execute(db, context_id, cli.json),
        Commands::Version => commands::version::execute(cli.json),
    }
}
