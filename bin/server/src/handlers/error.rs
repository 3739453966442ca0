use storage::StorageError;
use tracing::error;

/// Helper function for bad request errors
pub fn handle_error<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    error!("{}: {}", msg, e);
    actix_web::error::ErrorBadRequest(format!("{}: {}", msg, e))
}

/// Helper function for server errors
pub fn handle_server_error<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    error!("{}: {}", msg, e);
    actix_web::error::ErrorInternalServerError(format!("{}: {}", msg, e))
}

/// Map a storage failure onto a response: rejected paths are the client's fault, I/O is ours
pub fn handle_storage_error(e: StorageError) -> actix_web::Error {
    match e {
        StorageError::InvalidPath { path, source } => {
            handle_error(&format!("Rejected path {:?}", path), source)
        }
        StorageError::Io { context, source } => handle_server_error(&context, source),
    }
}
