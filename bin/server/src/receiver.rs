//! Receiver lifecycle: Stopped -> Listening -> Stopped

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use std::net::SocketAddr;
use std::sync::Arc;
use storage::{FilesystemStorage, Storage, StorageError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("Receiver is already listening on {0:?}")]
    AlreadyListening(Vec<SocketAddr>),

    #[error("No listen address configured")]
    NoListenAddress,

    #[error("Failed to initialize storage: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

enum ReceiverState {
    Stopped,
    Listening {
        handle: ServerHandle,
        task: JoinHandle<std::io::Result<()>>,
        addrs: Vec<SocketAddr>,
    },
}

/// HTTP receiver writing uploads under the storage root.
///
/// Every configured address is served by one server instance, so all
/// listeners share the same handlers and storage.
pub struct Receiver {
    config: ServerConfig,
    storage: Option<Arc<dyn Storage>>,
    state: ReceiverState,
}

impl Receiver {
    /// Receiver backed by a `FilesystemStorage` at `config.storage_root`
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            storage: None,
            state: ReceiverState::Stopped,
        }
    }

    /// Receiver backed by an existing storage; `config.storage_root` is ignored
    pub fn with_storage(config: ServerConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            storage: Some(storage),
            state: ReceiverState::Stopped,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, ReceiverState::Listening { .. })
    }

    /// Bound socket addresses; empty while stopped
    pub fn local_addrs(&self) -> &[SocketAddr] {
        match &self.state {
            ReceiverState::Listening { addrs, .. } => addrs,
            ReceiverState::Stopped => &[],
        }
    }

    /// Open storage, bind every listen address and start serving
    pub async fn start(&mut self) -> Result<Vec<SocketAddr>, ReceiverError> {
        if let ReceiverState::Listening { addrs, .. } = &self.state {
            return Err(ReceiverError::AlreadyListening(addrs.clone()));
        }
        if self.config.listen.is_empty() {
            return Err(ReceiverError::NoListenAddress);
        }

        let storage = match &self.storage {
            Some(storage) => storage.clone(),
            None => {
                let storage: Arc<dyn Storage> =
                    Arc::new(FilesystemStorage::open(&self.config.storage_root).await?);
                self.storage = Some(storage.clone());
                storage
            }
        };
        info!("Using storage root: {:?}", storage.root());

        let state = web::Data::new(AppState::new(storage));

        let mut server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(handlers::configure)
        });
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }
        for addr in &self.config.listen {
            server = server.bind(addr.as_str()).map_err(|source| {
                error!("Failed to bind to {}: {}", addr, source);
                ReceiverError::Bind {
                    addr: addr.clone(),
                    source,
                }
            })?;
        }

        let addrs = server.addrs();
        let server = server.run();
        let handle = server.handle();
        let task = actix_web::rt::spawn(server);

        for addr in &addrs {
            info!("Receiver listening on http://{}", addr);
        }

        self.state = ReceiverState::Listening {
            handle,
            task,
            addrs: addrs.clone(),
        };
        Ok(addrs)
    }

    /// Stop accepting connections, let in-flight requests finish, return to Stopped
    pub async fn stop(&mut self) -> Result<(), ReceiverError> {
        match std::mem::replace(&mut self.state, ReceiverState::Stopped) {
            ReceiverState::Stopped => Ok(()),
            ReceiverState::Listening {
                handle,
                task,
                addrs,
            } => {
                info!("Stopping receiver on {:?}", addrs);
                handle.stop(true).await;
                task.await??;
                Ok(())
            }
        }
    }

    /// Run until the server exits (e.g. on Ctrl-C)
    pub async fn wait(mut self) -> Result<(), ReceiverError> {
        match std::mem::replace(&mut self.state, ReceiverState::Stopped) {
            ReceiverState::Stopped => Ok(()),
            ReceiverState::Listening { task, .. } => {
                task.await??;
                Ok(())
            }
        }
    }
}
