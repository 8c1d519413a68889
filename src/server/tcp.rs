//! # Listener TCP
//! src/server/tcp.rs
//!
//! Acepta conexiones para siempre y las entrega al [`WorkerPool`]. El
//! listener nunca procesa requests: si la cola está llena se bloquea en
//! `enqueue` y el backlog del sistema operativo retiene a los clientes.
//!
//! Solo el bind es fatal. Un `accept` fallido se registra y se sigue.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::{Connection, ConnectionHandler};
use crate::workers::WorkerPool;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Servidor de archivos estáticos
pub struct Server {
    config: ServerConfig,
    host: String,
    handler: Arc<ConnectionHandler>,
}

impl Server {
    pub fn new(config: ServerConfig, host: impl Into<String>, handler: ConnectionHandler) -> Self {
        Self {
            config,
            host: host.into(),
            handler: Arc::new(handler),
        }
    }

    /// Dirección completa para bind (host:port)
    pub fn address(&self) -> String {
        self.config.address(&self.host)
    }

    /// Abre el puerto configurado
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.address();
        TcpListener::bind(&address).map_err(|source| ServerError::Bind { address, source })
    }

    /// Bind + accept loop. Solo retorna si el arranque falla.
    pub fn run(&self) -> Result<(), ServerError> {
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Accept loop sobre un listener ya abierto
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        self.config.validate()?;

        let handler = Arc::clone(&self.handler);
        let pool = WorkerPool::new(
            self.config.worker_count,
            self.config.queue_capacity,
            move |stream: TcpStream| handler.handle(stream),
        )
        .map_err(ServerError::Spawn)?;

        let local = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| self.address());

        info!(
            address = %local,
            root = %self.handler.document_root().display(),
            workers = pool.worker_count(),
            queue_capacity = pool.capacity(),
            "server listening"
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!(
                        peer = %stream.peer_label(),
                        queued = pool.queued(),
                        "connection accepted"
                    );
                    pool.enqueue(stream);
                }
                Err(e) => {
                    warn!(address = %local, error = %e, "cannot accept connection");
                }
            }
        }

        Ok(())
    }
}
