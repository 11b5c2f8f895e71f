//! clangenv CLI - build environments from a prebuilt LLVM/Clang toolchain

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use clangenv::util::diagnostic::{ConfigError, MissingToolError};
use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        report(&e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("clangenv=debug")
    } else {
        EnvFilter::new("clangenv=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color && std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    let config = &cli.config;
    match cli.command {
        Commands::Env(args) => commands::env::execute(args, config),
        Commands::Flags(args) => commands::flags::execute(args, config),
        Commands::Tools(args) => commands::tools::execute(args, config),
        Commands::Options(args) => commands::options::execute(args, config),
        Commands::Check => commands::check::execute(config),
        Commands::PackageId => commands::package_id::execute(config),
        Commands::Probe(args) => commands::probe::execute(args, config),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, with suggestions when the error carries them.
fn report(e: &anyhow::Error) {
    let diagnostic = if let Some(err) = e.downcast_ref::<ConfigError>() {
        Some(err.to_diagnostic())
    } else {
        e.downcast_ref::<MissingToolError>()
            .map(MissingToolError::to_diagnostic)
    };

    match diagnostic {
        Some(diag) => eprint!("{}", diag.format(std::io::stderr().is_terminal())),
        None => eprintln!("error: {:#}", e),
    }
}
