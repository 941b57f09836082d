//! SideJira - a JIRA companion for the command line.
//!
//! Browse, transition, comment on and create issues against a JIRA instance,
//! with token credentials held in the OS keyring and revalidated daily.

mod api;
mod auth;
mod commands;
mod config;
mod context;
mod error;
mod logging;
mod tree;

use std::sync::Arc;

use clap::Parser;

use commands::Command;
use context::{AppContext, ConsoleNotifier};

#[derive(Debug, Parser)]
#[command(name = "sidejira", version, about = "A JIRA sidebar companion for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init() {
        eprintln!("warning: logging disabled: {}", e);
    }

    let cli = Cli::parse();
    let context = AppContext::new(Arc::new(ConsoleNotifier));

    if let Err(e) = commands::run(&context, cli.command).await {
        context.notifier.error(&e.user_message());
        std::process::exit(1);
    }
}
