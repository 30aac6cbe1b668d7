//! blogpost - publish AsciiDoc documents to a WordPress blog.
//!
//! Provides commands for:
//! - `create` / `update`: convert a document and publish it over XML-RPC
//! - `delete`: remove a published post and its local cache
//! - `info` / `reset`: inspect or drop the local cache record
//! - `list`: list recent posts or pages on the server

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DeleteArgs, Globals, InfoArgs, ListArgs, Mode, PostArgs, ResetArgs};
use output::Output;

/// blogpost - WordPress publishing from the command line.
#[derive(Parser)]
#[command(name = "blogpost", version, about)]
struct Cli {
    /// Configuration file path (default: ~/.blogpost.toml).
    #[arg(short = 'f', long, global = true)]
    conf_file: Option<PathBuf>,

    /// Show what would be done without changing server or disk state.
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Increase verbosity.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a document for the first time.
    #[command(visible_alias = "c")]
    Create(PostArgs),
    /// Republish a previously published document.
    #[command(visible_alias = "u")]
    Update(PostArgs),
    /// Delete a published post and its local cache.
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
    /// Print the cached publication state of a document.
    #[command(visible_alias = "i")]
    Info(InfoArgs),
    /// List recent posts or pages on the server.
    #[command(visible_alias = "l")]
    List(ListArgs),
    /// Delete the local cache record of a document.
    #[command(visible_alias = "r")]
    Reset(ResetArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let globals = Globals {
        conf_file: cli.conf_file,
        dry_run: cli.dry_run,
    };

    let result = match cli.command {
        Commands::Create(args) => args.execute(&globals, Mode::Create),
        Commands::Update(args) => args.execute(&globals, Mode::Update),
        Commands::Delete(args) => args.execute(&globals),
        Commands::Info(args) => args.execute(),
        Commands::List(args) => args.execute(&globals),
        Commands::Reset(args) => args.execute(&globals),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
