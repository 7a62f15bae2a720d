//! mark CLI - publish markdown documents to Confluence.
//!
//! Provides commands for:
//! - `compile`: Render a document to Confluence storage format
//! - `publish`: Create or update the Confluence pages of documents

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CompileArgs, PublishArgs};
use output::Output;

/// mark - Markdown to Confluence.
#[derive(Parser)]
#[command(name = "mark", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace-level logging.
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a document to storage format and print it.
    Compile(CompileArgs),
    /// Publish documents to Confluence.
    Publish(PublishArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --trace wins over --verbose, otherwise use RUST_LOG or default to WARN
    let filter = if cli.trace {
        EnvFilter::new("trace")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compile(args) => args.execute(),
        Commands::Publish(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
