//! Quill CLI - document rendering engine.
//!
//! Provides commands for:
//! - `render`: Convert documents between syntaxes
//! - `syntaxes`: List the registered syntaxes
//! - `macros`: List the available macros

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{MacrosArgs, RenderArgs, SyntaxesArgs};
use output::Output;

/// Quill - document rendering engine.
#[derive(Parser)]
#[command(name = "quill", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert documents from one syntax to another.
    Render(RenderArgs),
    /// List the registered syntaxes.
    Syntaxes(SyntaxesArgs),
    /// List the available macros.
    Macros(MacrosArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Syntaxes(args) => args.execute(),
        Commands::Macros(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
