pub mod error;
pub mod filesystem;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::stream::LocalBoxStream;
use std::io;
use std::path::{Path, PathBuf};

pub use error::StorageError;
pub use filesystem::FilesystemStorage;

/// Request body handed to the storage layer, chunk by chunk
pub type BodyStream<'a> = LocalBoxStream<'a, io::Result<Bytes>>;

/// Result of a completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Local path the body was written to
    pub path: PathBuf,
    /// Number of body bytes written
    pub bytes_written: u64,
}

/// Storage trait for incoming uploads.
///
/// Implementations hold no per-request state. Two writes to the same
/// relative path are not serialised: whichever finishes last wins.
#[async_trait(?Send)]
pub trait Storage: Send + Sync {
    /// Root directory every relative path is resolved against
    fn root(&self) -> &Path;

    /// Write a body to `relative_path` under the root and restore its modification time
    ///
    /// The body is written completely before this returns. A partially written
    /// file is left in place when the body or the disk fails midway.
    async fn store_file(
        &self,
        relative_path: &str,
        body: BodyStream<'_>,
        mod_time: Option<DateTime<Utc>>,
    ) -> Result<StoredFile, StorageError>;
}
