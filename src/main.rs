use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use rusqlite::Connection;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::catalog::HttpCatalog;
use crate::cli::{CliCommand, MigrationDirection};
use crate::config::KeyResolver;
use crate::location::StaticLocation;

mod app;
mod catalog;
mod cli;
pub mod commands;
mod config;
mod detail;
mod location;
mod points;
mod schema;
pub mod service;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting ecoleta");

    let args = cli::Args::parse();

    if let Some(CliCommand::Migrate {
        direction,
        database,
    }) = &args.command
    {
        return migrate(*direction, database);
    }

    let mut config = config::load()?;
    args.apply_to(&mut config);
    let params = args.route(&config)?;

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);
    let catalog = Arc::new(HttpCatalog::new(
        config.api.base_url.clone(),
        config.api.timeout(),
    )?);
    let location = Arc::new(StaticLocation::from(&config.location));

    let mut app = App::new(params.clone(), catalog, location, resolver, theme);
    app.run().await?;

    if let Err(e) = config::save_last_search(&params.uf, &params.city) {
        warn!("Failed to remember last search: {e}");
    }

    Ok(())
}

fn migrate(direction: MigrationDirection, database: &Path) -> Result<()> {
    let mut conn = Connection::open(database)?;
    match direction {
        MigrationDirection::Up => schema::migrate_up(&mut conn)?,
        MigrationDirection::Down => schema::migrate_down(&mut conn)?,
    }
    println!(
        "{} is at schema version {}",
        database.display(),
        schema::version(&conn)?
    );
    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("ecoleta").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "ecoleta.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
