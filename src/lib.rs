pub mod analysis;
mod cli;
pub mod db;
pub mod habits;
pub mod settings;
pub mod stats;
mod utils;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Commands};
use db::Database;
use habits::commands;
use settings::SettingsStore;

pub struct AppState {
    pub db: Database,
    pub settings: SettingsStore,
}

fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("habitrack"))
        .context("could not determine the user data directory")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn dispatch(state: &AppState, command: Commands) -> Result<(), String> {
    let output = match command {
        Commands::Create {
            title,
            recurrence,
            created_at,
        } => serde_json::to_value(commands::create_habit(
            state,
            &title,
            recurrence,
            created_at.as_deref(),
        )?),
        Commands::Perform { habit_id, at } => {
            serde_json::to_value(commands::perform_habit(state, &habit_id, at.as_deref())?)
        }
        Commands::Delete { habit_id } => {
            commands::delete_habit(state, &habit_id)?;
            Ok(serde_json::json!({ "deleted": habit_id }))
        }
        Commands::List => serde_json::to_value(commands::list_habits(state)?),
        Commands::Show { habit_id } => serde_json::to_value(commands::show_habit(state, &habit_id)?),
        Commands::Streaks {
            habit_id,
            sort_by,
            order,
        } => serde_json::to_value(commands::get_streaks(state, &habit_id, sort_by, order)?),
        Commands::Latest { habit_id, today } => serde_json::to_value(
            commands::get_latest_streak(state, &habit_id, today.as_deref())?,
        ),
        Commands::Rate {
            habit_id,
            range,
            start,
            end,
        } => serde_json::to_value(commands::get_completion_rate(
            state,
            &habit_id,
            range,
            start.as_deref(),
            end.as_deref(),
        )?),
        Commands::Overview {
            sort_by,
            order,
            recurrence,
            today,
        } => serde_json::to_value(commands::get_overview(
            state,
            sort_by,
            order,
            recurrence,
            today.as_deref(),
        )?),
        Commands::Config {
            streak_sort_by,
            streak_order,
            database_file,
            clear_database_file,
        } => serde_json::to_value(commands::update_settings(
            state,
            streak_sort_by,
            streak_order,
            database_file,
            clear_database_file,
        )?),
    }
    .map_err(|e| e.to_string())?;

    print_json(&output).map_err(|e| e.to_string())
}

pub fn run() -> Result<()> {
    // Info by default, RUST_LOG takes precedence
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => data_dir()?.join("settings.json"),
    };
    let settings = SettingsStore::new(settings_path)?;

    let db_path = match cli.db.or_else(|| settings.database_file()) {
        Some(path) => path,
        None => data_dir()?.join("habitrack.sqlite3"),
    };
    let db = Database::open(db_path)?;

    let state = AppState { db, settings };
    let result = dispatch(&state, cli.command);
    state.db.close();

    result.map_err(|message| anyhow!(message))
}
