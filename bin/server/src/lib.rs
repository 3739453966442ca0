//! Upload receiver: accepts `PUT /upload/<path>` and writes the body under a storage root

pub mod config;
pub mod constants;
pub mod handlers;
pub mod receiver;
pub mod state;

pub use config::ServerConfig;
pub use receiver::{Receiver, ReceiverError};
