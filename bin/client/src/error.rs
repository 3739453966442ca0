use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a transfer stops; every one of them ends the batch
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Cannot access {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} is not inside base directory {base:?}")]
    OutsideBase { path: PathBuf, base: PathBuf },

    #[error("Cannot express {path:?} as a relative upload path")]
    UnsupportedPath { path: PathBuf },

    #[error("Invalid server URL {url}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Failed to connect to server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload failed: {status} - {body}")]
    Rejected { status: StatusCode, body: String },
}
