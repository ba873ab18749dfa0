mod api;
mod cli;
mod config;
mod error;
mod models;
mod schedule;
mod tui;
mod utils;

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use api::MyQuranClient;
use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none())?;

    let mut config = AppConfig::load().context("Loading config")?;
    let client = MyQuranClient::new(&config.api.base_url).context("Building HTTP client")?;

    match cli.command {
        Some(Commands::Times { date, location }) => {
            handlers::handle_times(&client, &config, date, location.as_deref())?;
        }
        Some(Commands::Locations { query }) => {
            handlers::handle_locations(&client, query.as_deref())?;
        }
        Some(Commands::Location { id }) => {
            handlers::handle_set_location(&client, &mut config, &id)?;
        }
        Some(Commands::Config(args)) => {
            handlers::handle_config(&mut config, &args)?;
        }

        // No subcommand → launch the board
        None => {
            tui::app::run(config, Arc::new(client))?;
        }
    }

    Ok(())
}

/// The board owns the terminal, so its log goes to a file in the data dir.
/// Subcommands log to stderr.
fn init_logging(to_file: bool) -> Result<()> {
    let default_level = if to_file { "info" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if to_file {
        AppConfig::ensure_data_dir()?;
        let path = AppConfig::log_path()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Opening log file {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
