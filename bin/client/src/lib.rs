//! Upload transmitter: walks a selected file or directory and PUTs every file to the receiver

pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod progress;
pub mod upload;

pub use batch::UploadBatch;
pub use config::ClientConfig;
pub use error::TransferError;
pub use progress::{ProgressSink, Status};
pub use upload::Transmitter;
