//! rHousekeep library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (entity store, change ledger, snapshot codec, sync engine).

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod remote;
pub mod storage;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use context::AppContext;
use errors::AppResult;
use models::trackable::TrackableType;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: Config) -> AppResult<()> {
    let persist = !cli.test;

    match &cli.command {
        Commands::Init => return commands::init::handle(cli),
        Commands::Config { .. } => return commands::config::handle(&cli.command, &cfg, persist),
        _ => {}
    }

    let mut ctx = AppContext::open(cfg, persist)?;
    let ctx = &mut ctx;

    match &cli.command {
        Commands::Init | Commands::Config { .. } => Ok(()),
        Commands::Db { .. } => commands::db::handle(&cli.command, ctx),
        Commands::Log { .. } => commands::log::handle(&cli.command, ctx),
        Commands::Chore { action } => commands::trackable::handle(TrackableType::Chore, action, ctx),
        Commands::Exercise { action } => {
            commands::trackable::handle(TrackableType::Exercise, action, ctx)
        }
        Commands::Grocery { action } => commands::grocery::handle(action, ctx),
        Commands::Expense { action } => commands::expense::handle(action, ctx),
        Commands::Person { action } => commands::person::handle(action, ctx),
        Commands::Sync => commands::sync::handle_sync(ctx),
        Commands::Remote { action } => commands::sync::handle_remote(action, ctx),
        Commands::Time { .. } => commands::time::handle(&cli.command, ctx),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // test mode never reads the user's configuration file
    let mut cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, cfg)
}
