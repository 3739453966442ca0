//! One-way status reporting from a running transfer

use crate::error::TransferError;
use std::fmt;
use std::path::Path;
use std::sync::mpsc;

/// Receives human-readable status lines; nothing is acknowledged back
pub trait ProgressSink: Send {
    fn report(&self, status: &str);
}

// A dropped receiver just means nobody is watching anymore
impl ProgressSink for mpsc::Sender<String> {
    fn report(&self, status: &str) {
        let _ = self.send(status.to_string());
    }
}

impl ProgressSink for mpsc::SyncSender<String> {
    fn report(&self, status: &str) {
        let _ = self.send(status.to_string());
    }
}

/// Status lines emitted by a transfer
#[derive(Debug)]
pub enum Status<'a> {
    Sending(&'a Path),
    Failed(&'a TransferError),
    Done(usize),
}

impl fmt::Display for Status<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Sending(path) => write!(f, "Sending: {}", path.display()),
            Status::Failed(e) => write!(f, "Error: {}", e),
            Status::Done(count) => write!(f, "Done. {} file(s) transferred.", count),
        }
    }
}
