// config.rs
use clap::{App, Arg};
use log::{debug, info, LevelFilter};
use sqlx::mysql::MySqlConnectOptions;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "utf8mb4";

pub const DEFAULT_COUNT_FILE: &str = "query_counts.json";
pub const DEFAULT_QUERY_LOG_FILE: &str = "query_log.log";
pub const DEFAULT_LOG_FILE: &str = "app.log";
pub const DEFAULT_TOP_N: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a valid port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },
    #[error("invalid --{flag} '{value}'")]
    InvalidArgument { flag: &'static str, value: String },
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

/// Connection settings for the catalog database, read from `HOST`, `PORT`,
/// `USER`, `PASSWORD`, `DATABASE` and `CHARSET`.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub charset: String,
}

impl DbConfig {
    /// Loads `.env` from the working directory when there is one, then reads
    /// the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { var: "PORT", value })?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| String::from(DEFAULT_HOST)),
            port,
            user: lookup("USER"),
            password: lookup("PASSWORD"),
            database: lookup("DATABASE"),
            charset: lookup("CHARSET").unwrap_or_else(|| String::from(DEFAULT_CHARSET)),
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .charset(&self.charset);
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(database) = &self.database {
            options = options.database(database);
        }
        options
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("charset", &self.charset)
            .finish()
    }
}

/// File locations and menu settings taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub count_file: PathBuf,
    pub query_log_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub top_n: usize,
    pub use_mock_catalog: bool,
}

impl AppConfig {
    /// Parses the command line. `--help` and `--version` come back as
    /// `ConfigError::Cli` for the caller to print.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = App::new("film-query")
            .version("0.1.0")
            .about("Search the sakila film catalog and track the most popular queries")
            .arg(
                Arg::new("count_file")
                    .long("count-file")
                    .takes_value(true)
                    .default_value(DEFAULT_COUNT_FILE)
                    .help("JSON file holding the per-query execution counts"),
            )
            .arg(
                Arg::new("query_log")
                    .long("query-log")
                    .takes_value(true)
                    .default_value(DEFAULT_QUERY_LOG_FILE)
                    .help("Append-only log of executed queries"),
            )
            .arg(
                Arg::new("log_file")
                    .long("log-file")
                    .takes_value(true)
                    .default_value(DEFAULT_LOG_FILE)
                    .help("Application log file"),
            )
            .arg(
                Arg::new("log_level")
                    .long("log-level")
                    .takes_value(true)
                    .default_value("info")
                    .help("Application log level (off, error, warn, info, debug, trace)"),
            )
            .arg(
                Arg::new("top_n")
                    .long("top-n")
                    .takes_value(true)
                    .help("Number of popular queries to show"),
            )
            .arg(
                Arg::new("use_mock_catalog")
                    .long("use-mock-catalog")
                    .help("Serve a built-in sample catalog instead of connecting to MySQL"),
            )
            .try_get_matches_from(args)?;

        let value = |name: &str| matches.value_of(name).unwrap_or_default().to_string();
        let log_level =
            LevelFilter::from_str(&value("log_level")).map_err(|_| ConfigError::InvalidArgument {
                flag: "log-level",
                value: value("log_level"),
            })?;
        let top_n = match matches.value_of("top_n") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidArgument {
                    flag: "top-n",
                    value: raw.to_string(),
                })?,
            None => DEFAULT_TOP_N,
        };

        Ok(Self {
            count_file: PathBuf::from(value("count_file")),
            query_log_file: PathBuf::from(value("query_log")),
            log_file: PathBuf::from(value("log_file")),
            log_level,
            top_n,
            use_mock_catalog: matches.is_present("use_mock_catalog"),
        })
    }
}
