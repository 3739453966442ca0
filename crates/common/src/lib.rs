pub mod file_utils;
pub mod utils;

use serde::{Deserialize, Serialize};

pub use utils::{format_mod_time, parse_mod_time};

/// Upload route, without the trailing slash
pub const UPLOAD_ROUTE: &str = "/upload";

/// Prefix stripped from a request path to get the relative file path
pub const UPLOAD_PREFIX: &str = "/upload/";

/// Header carrying the source file's modification time (RFC3339)
pub const MODTIME_HEADER: &str = "X-File-ModTime";

/// Content type of every upload body
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Health check endpoint path
pub const HEALTH_ENDPOINT: &str = "/health";

/// Response from health check endpoint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String, // "ok" when healthy
}
