mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::{AppConfig, StorageBackend};
use habitual::db::{FileStore, SqliteStore, Store};
use habitual::utils::date;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    let today = match cli.today.as_deref() {
        Some(s) => date::parse_date(s).context("Parsing --today")?,
        None => date::today(),
    };
    debug!("today is {}", date::format_date(today));

    if let Some(Commands::Init { backend, user }) = &cli.command {
        return handlers::handle_init(&mut config, backend, user.as_deref());
    }

    let store = open_store(&config)?;
    let store = store.as_ref();

    match cli.command {
        Some(Commands::Init { .. }) => unreachable!(),
        Some(Commands::Add {
            name,
            description,
            icon,
            color,
            freq,
            days,
        }) => {
            let draft = handlers::build_new_habit(&name, description, icon, color, &freq, &days)?;
            handlers::handle_add(store, &config, draft)?;
        }
        Some(Commands::List { mine }) => {
            handlers::handle_list(store, &config, today, mine)?;
        }
        Some(Commands::Toggle { habit, on }) => {
            handlers::handle_toggle(store, &habit, on.as_deref(), today)?;
        }
        Some(Commands::Remove { habit }) => {
            handlers::handle_remove(store, &habit)?;
        }
        Some(Commands::Stats { week }) => {
            handlers::handle_stats(store, &config, today, week)?;
        }
        Some(Commands::Suggest { categories, add }) => {
            handlers::handle_suggest(store, &config, &categories, add)?;
        }
        Some(Commands::Export) => {
            handlers::handle_export(store)?;
        }
        Some(Commands::Challenge { action }) => {
            handlers::handle_challenge(store, &config, today, &action)?;
        }

        // No subcommand → dashboard
        None => {
            handlers::handle_list(store, &config, today, false)?;
            handlers::handle_stats(store, &config, today, false)?;
        }
    }

    Ok(())
}

fn open_store(config: &AppConfig) -> Result<Box<dyn Store>> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db_path = config.db_path()?;
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("Opening database at {:?}", db_path))?;
            Ok(Box::new(store))
        }
        StorageBackend::File => Ok(Box::new(FileStore::new(config.files_dir()?))),
    }
}
