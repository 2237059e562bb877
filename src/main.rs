//! gNxI Console - an operator console for conformance test runs
//!
//! Talks to the tester web service over HTTP: registry and bundle
//! management through simple verbs, run submission and live output
//! streaming through the run console.

use clap::Parser;
use gnxi_console::{cli, commands::Commands, common::logging};

#[derive(Parser)]
#[command(name = "gnxi-console", about = "Console for gNxI conformance test runs")]
#[command(version, long_about = None)]
struct Cli {
    /// Base URL of the tester server (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command, cli.base_url).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
