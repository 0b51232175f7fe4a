// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Velora - conversational automation for service businesses.
//!
//! This is the binary entry point for the Velora engine.

mod chat;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Velora - conversational automation for service businesses.
#[derive(Parser, Debug)]
#[command(name = "velora", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session against the local engine.
    Chat,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match velora_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                eprintln!("velora: {error}");
            }
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Chat) => {
            if let Err(error) = chat::run_chat(config).await {
                eprintln!("velora: {error}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(error) => {
                eprintln!("velora: failed to render config: {error}");
                std::process::exit(1);
            }
        },
        None => {
            println!("velora: use --help for available commands");
        }
    }
}
