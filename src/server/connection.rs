//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Ciclo de vida de una conexión aceptada:
//!
//! ```text
//! Idle -> Reading -> Parsing -> Resolving -> Responding -> Closed
//! ```
//!
//! - **Reading**: timeout de lectura de 10 s. Timeout o error de I/O
//!   cierran la conexión sin respuesta.
//! - **Parsing**: un request malformado cierra sin respuesta.
//! - **Resolving**: métodos distintos de GET/HEAD reciben 405 sin pasar
//!   por el resolver. El resolver puede responder 403/404 directamente.
//! - **Responding**: archivo abierto -> 200 (body solo con GET). Si no se
//!   puede abrir -> 404, o 403 si era el documento index.
//!
//! Todos los caminos terminan en el mismo paso de cierre, una sola vez.
//! Ningún error sale de [`ConnectionHandler::handle`].

use crate::error::ConnectionError;
use crate::http::{mime, Method, Request, ResponseWriter, StatusCode};
use crate::resolver::{PathResolver, Resolution, ResolvedPath};
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tiempo máximo esperando datos del cliente
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Una conexión aceptada: stream de bytes que se puede cerrar
///
/// `close` consume la conexión, así que solo puede ejecutarse una vez.
pub trait Connection: Read + Write + Send {
    /// Configura el timeout de lectura
    fn set_idle_timeout(&self, timeout: Duration) -> io::Result<()>;

    /// Dirección del cliente, para los logs
    fn peer_label(&self) -> String;

    /// Cierra la conexión en ambas direcciones
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

impl Connection for TcpStream {
    fn set_idle_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(timeout))
    }

    fn peer_label(&self) -> String {
        self.peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn close(self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // El cliente ya cerró su lado
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            result => result,
        }
    }
}

/// Resultado de una conexión que recibió respuesta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub request: Request,
    pub status: StatusCode,
    pub body_bytes: u64,
}

/// Atiende conexiones de principio a fin
///
/// Es inmutable: los workers lo comparten detrás de un `Arc`.
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    resolver: PathResolver,
    idle_timeout: Duration,
}

impl ConnectionHandler {
    pub fn new(document_root: impl Into<PathBuf>) -> Self {
        Self {
            resolver: PathResolver::new(document_root),
            idle_timeout: IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn document_root(&self) -> &Path {
        self.resolver.root()
    }

    /// Procesa una conexión y la cierra. Nunca falla ni hace panic por
    /// errores de la conexión.
    pub fn handle<C: Connection>(&self, mut conn: C) {
        let peer = conn.peer_label();
        let start = Instant::now();

        match self.process(&mut conn) {
            Ok(exchange) => {
                info!(
                    peer = %peer,
                    method = %exchange.request.method(),
                    target = exchange.request.target(),
                    status = exchange.status.as_u16(),
                    bytes = exchange.body_bytes,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "request served"
                );
            }
            Err(ConnectionError::Malformed(e)) => {
                warn!(peer = %peer, error = %e, "malformed request, closing without response");
            }
            Err(ConnectionError::IdleTimeout) => {
                warn!(
                    peer = %peer,
                    timeout_ms = self.idle_timeout.as_millis() as u64,
                    "idle timeout, closing"
                );
            }
            Err(e @ ConnectionError::Transport(_)) => {
                warn!(peer = %peer, error = %e, "connection failed");
            }
        }

        if let Err(e) = conn.close() {
            debug!(peer = %peer, error = %e, "error closing connection");
        }
    }

    /// Lee, parsea, resuelve y responde. Cualquier `Err` significa que no
    /// se completó una respuesta.
    pub fn process<C: Connection>(&self, conn: &mut C) -> Result<Exchange, ConnectionError> {
        // Idle -> Reading
        if let Err(e) = conn.set_idle_timeout(self.idle_timeout) {
            warn!(error = %e, "cannot set read timeout");
        }

        // Reading -> Parsing
        let request = Request::read_from(&mut BufReader::new(&mut *conn))?;
        debug!(method = %request.method(), target = request.target(), "request parsed");

        let mut writer = ResponseWriter::new(&mut *conn);
        let method = request.method();

        if !method.is_servable() {
            writer.send_header(StatusCode::MethodNotAllowed, None, 0)?;
            return Ok(Exchange {
                request,
                status: StatusCode::MethodNotAllowed,
                body_bytes: 0,
            });
        }

        // Resolving -> Responding
        let (status, body_bytes) = match self.resolver.resolve(request.target()) {
            Resolution::Reject(status) => {
                writer.send_header(status, None, 0)?;
                (status, 0)
            }
            Resolution::File(resolved) => Self::send_file(&mut writer, &resolved, method)?,
        };

        Ok(Exchange {
            request,
            status,
            body_bytes,
        })
    }

    fn send_file<W: Write>(
        writer: &mut ResponseWriter<W>,
        resolved: &ResolvedPath,
        method: Method,
    ) -> Result<(StatusCode, u64), ConnectionError> {
        let (file, length) = match open_regular_file(resolved.path()) {
            Ok(opened) => opened,
            Err(e) => {
                let status = if resolved.is_index() {
                    StatusCode::Forbidden
                } else {
                    StatusCode::NotFound
                };
                debug!(
                    path = %resolved.path().display(),
                    error = %e,
                    status = status.as_u16(),
                    "cannot open file"
                );

                writer.send_header(status, None, 0)?;
                return Ok((status, 0));
            }
        };

        let content_type = mime::content_type_for(resolved.path());
        writer.send_header(StatusCode::Ok, content_type, length)?;

        let sent = match method {
            Method::GET => writer.send_body(file)?,
            _ => 0,
        };

        Ok((StatusCode::Ok, sent))
    }
}

/// Abre un archivo regular y retorna su tamaño
///
/// Directorios, pipes y demás se tratan como inexistentes.
fn open_regular_file(path: &Path) -> io::Result<(File, u64)> {
    if !fs::metadata(path)?.is_file() {
        return Err(io::Error::new(io::ErrorKind::Other, "not a regular file"));
    }

    let file = File::open(path)?;
    let length = file.metadata()?.len();
    Ok((file, length))
}
