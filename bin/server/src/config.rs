use crate::constants::{
    DEFAULT_LISTEN_ADDRS, DEFAULT_STORAGE_ROOT, ENV_LISTEN, ENV_STORAGE_ROOT, ENV_WORKERS,
};
use clap::{Arg, ArgAction, Command};
use std::ffi::OsString;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory received files are written under
    pub storage_root: PathBuf,
    /// Addresses to listen on, all served by the same handlers
    pub listen: Vec<String>,
    /// Worker threads per listener; actix default when unset
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            listen: DEFAULT_LISTEN_ADDRS.iter().map(|s| s.to_string()).collect(),
            workers: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process arguments and environment
    pub fn load() -> Result<Self, std::io::Error> {
        Self::from_args(std::env::args_os())
    }

    /// Priority: command-line args > environment variables > defaults
    pub fn from_args<I, T>(args: I) -> Result<Self, std::io::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Command::new("server")
            .about("Receives uploaded files and writes them under the storage root")
            .arg(
                Arg::new("storage-root")
                    .long("storage-root")
                    .value_name("DIR")
                    .help("Directory received files are written to (default: ./upload, or UPLOAD_DIR env var)"),
            )
            .arg(
                Arg::new("listen")
                    .long("listen")
                    .value_name("ADDR")
                    .action(ArgAction::Append)
                    .help("Address to listen on, repeatable (default: localhost:4711 and 0.0.0.0:8080, or SERVER_LISTEN env var)"),
            )
            .arg(
                Arg::new("workers")
                    .long("workers")
                    .value_name("N")
                    .help("Number of worker threads (default: one per core, or SERVER_WORKERS env var)"),
            )
            .try_get_matches_from(args)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

        let defaults = Self::default();

        let storage_root = matches
            .get_one::<String>("storage-root")
            .cloned()
            .or_else(|| std::env::var(ENV_STORAGE_ROOT).ok())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_root);

        let listen: Vec<String> = match matches.get_many::<String>("listen") {
            Some(values) => values.cloned().collect(),
            None => std::env::var(ENV_LISTEN)
                .ok()
                .map(|v| parse_listen_list(&v))
                .filter(|addrs| !addrs.is_empty())
                .unwrap_or(defaults.listen),
        };

        let workers_str = matches
            .get_one::<String>("workers")
            .cloned()
            .or_else(|| std::env::var(ENV_WORKERS).ok());

        let workers = match workers_str {
            Some(s) => Some(parse_workers(&s)?),
            None => None,
        };

        Ok(ServerConfig {
            storage_root,
            listen,
            workers,
        })
    }
}

fn parse_listen_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_workers(value: &str) -> Result<usize, std::io::Error> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid worker count: {}", value),
        )),
    }
}
