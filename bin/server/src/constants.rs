/// Default storage root for received files
pub const DEFAULT_STORAGE_ROOT: &str = "./upload";

/// Default listen addresses; every one serves the same handlers
pub const DEFAULT_LISTEN_ADDRS: &[&str] = &["localhost:4711", "0.0.0.0:8080"];

/// Environment variable overriding the storage root
pub const ENV_STORAGE_ROOT: &str = "UPLOAD_DIR";

/// Environment variable overriding the listen addresses (comma separated)
pub const ENV_LISTEN: &str = "SERVER_LISTEN";

/// Environment variable overriding the number of worker threads
pub const ENV_WORKERS: &str = "SERVER_WORKERS";
