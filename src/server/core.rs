use log::{error, info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::client::{handle_client, reject_client};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::connection_limit::ConnectionLimiter;
use crate::middleware::logging::log_connection;
use crate::storage::FileOperations;

pub struct Server {
    listener: TcpListener,
    ops: Arc<FileOperations>,
    config: Arc<ServerConfig>,
    limiter: ConnectionLimiter,
}

impl Server {
    /// Initializes the base directory from `config` and binds the listener.
    ///
    /// Fails if the base directory is unusable; no request is served then.
    pub async fn from_config(config: ServerConfig) -> Result<Self, ServerError> {
        let ops = FileOperations::open(config.base_dir_path()).await?;
        Self::bind(config, ops).await
    }

    /// Binds the listener for an already initialized `FileOperations`.
    pub async fn bind(config: ServerConfig, ops: FileOperations) -> Result<Self, ServerError> {
        let addr = config.listen_socket();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!("Server bound to {}", addr);

        Ok(Self {
            listener,
            ops: Arc::new(ops),
            limiter: ConnectionLimiter::new(config.max_connections),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until Ctrl-C.
    pub async fn run(self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
    }

    /// Accepts connections until `shutdown` resolves, then stops listening
    /// and waits up to the configured grace period for open connections to
    /// finish their in-flight requests. Connections still open after that
    /// are aborted.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Serving files from {} on {} (max {} connections)",
            self.ops.base_dir().display(),
            self.config.listen_socket(),
            self.limiter.max_connections()
        );

        tokio::pin!(shutdown);

        let (drain_tx, drain_rx) = watch::channel(false);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        self.dispatch(&mut connections, stream, addr, drain_rx.clone())
                    }
                    Err(e) => error!("Error accepting connection: {}", e),
                },
                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = finished {
                        error!("Connection task failed: {}", e);
                    }
                }
            }
        }

        drop(self.listener);
        drain_tx.send_replace(true);

        if !connections.is_empty() {
            info!(
                "Waiting up to {:?} for {} open connection(s)",
                self.config.shutdown_grace(),
                connections.len()
            );
        }

        let drained = timeout(self.config.shutdown_grace(), async {
            while let Some(finished) = connections.join_next().await {
                if let Err(e) = finished {
                    error!("Connection task failed: {}", e);
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "Grace period elapsed, aborting {} connection(s)",
                connections.len()
            );
            connections.shutdown().await;
        }
    }

    fn dispatch(
        &self,
        connections: &mut JoinSet<()>,
        stream: TcpStream,
        addr: SocketAddr,
        shutdown: watch::Receiver<bool>,
    ) {
        let Some(permit) = self.limiter.try_acquire() else {
            warn!(
                "Rejecting {}: {} connections already active",
                addr,
                self.limiter.active()
            );
            connections.spawn(reject_client(stream, addr, Arc::clone(&self.config)));
            return;
        };

        log_connection(&addr);
        let ops = Arc::clone(&self.ops);
        let config = Arc::clone(&self.config);

        // Spawn a task for each client so accept loop doesn't block
        connections.spawn(async move {
            handle_client(stream, addr, ops, config, shutdown).await;
            drop(permit);
        });
    }
}
