// TCP Server listener

use super::config::ServerConfig;
use super::connection::Connection;
use crate::commands::Dispatcher;
use crate::storage::Keyspace;
use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

pub struct RedisServer {
    config: Arc<ServerConfig>,
    dispatcher: Arc<Dispatcher>,
    /// Limit max concurrent connections
    limit_connections: Arc<Semaphore>,
}

impl RedisServer {
    pub fn new(config: ServerConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(Keyspace::new())));
        info!(commands = dispatcher.table().len(), "command table ready");

        Self {
            limit_connections: Arc::new(Semaphore::new(config.max_clients)),
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Bind the configured address and serve until an accept loop failure
    pub async fn run(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.addr())
            .await
            .with_context(|| format!("failed to bind {}", self.config.addr()))?;
        self.serve(listener).await
    }

    /// Serve clients from an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        info!("listening on {}", listener.local_addr()?);

        loop {
            // Wait for permit to accept new connection
            let permit = self
                .limit_connections
                .clone()
                .acquire_owned()
                .await
                .context("connection limiter closed")?;

            let (socket, addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            debug!("Accepted connection from {}", addr);
            if let Err(e) = socket.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
            }

            let dispatcher = self.dispatcher.clone();
            tokio::spawn(async move {
                let mut connection = Connection::new(socket, addr, dispatcher);
                if let Err(e) = connection.process().await {
                    warn!("Connection {} closed with error: {:#}", addr, e);
                }
                debug!("Connection {} closed", addr);
                // Drop permit when connection closes
                drop(permit);
            });
        }
    }
}
