use anyhow::{Context, Result};
use film_query::catalog::{CatalogConnector, MockCatalogConnector, MySqlCatalogConnector};
use film_query::config::{AppConfig, ConfigError, DbConfig};
use film_query::counter::FileCounterStore;
use film_query::dispatcher::QueryDispatcher;
use film_query::menu::Menu;
use film_query::query_log::QueryLog;
use log::{info, LevelFilter};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;

fn setup_logger(log_file: &Path, level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                message
            ))
        })
        .level(level)
        .level_for("sqlx", LevelFilter::Warn)
        .chain(fern::log_file(log_file)?)
        .apply()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = match AppConfig::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };
    setup_logger(&config.log_file, config.log_level)
        .with_context(|| format!("could not open log file {}", config.log_file.display()))?;
    info!("Starting film-query with {:?}", config);

    let mysql = if config.use_mock_catalog {
        None
    } else {
        let db_config = DbConfig::from_env()?;
        info!("Catalog database: {:?}", db_config);
        Some(Arc::new(MySqlCatalogConnector::new(
            db_config.connect_options(),
        )))
    };

    let catalog: Arc<dyn CatalogConnector + Send + Sync> = match &mysql {
        Some(connector) => {
            if connector.connect().await.is_err() {
                eprintln!(
                    "Could not connect to the database, will retry on the next query (see {}).",
                    config.log_file.display()
                );
            }
            connector.clone()
        }
        None => {
            println!("Using the built-in sample catalog.");
            Arc::new(MockCatalogConnector::sample())
        }
    };

    let counter = Box::new(FileCounterStore::new(config.count_file.clone()));
    let mut dispatcher = QueryDispatcher::new(catalog, counter)
        .with_query_log(QueryLog::new(config.query_log_file.clone()));

    let reader = BufReader::new(tokio::io::stdin());
    let mut menu = Menu::new(reader, std::io::stdout(), config.top_n);
    menu.run(&mut dispatcher).await?;

    if let Some(connector) = mysql {
        connector.close().await;
    }
    info!("film-query exiting");
    Ok(())
}
