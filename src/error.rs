//! # Errores del Servidor
//! src/error.rs
//!
//! Dos familias de errores:
//!
//! - [`ServerError`]: fatales al arrancar (configuración, bind, threads).
//!   Terminan el proceso.
//! - [`ConnectionError`]: afectan a una sola conexión. Se registran y la
//!   conexión se cierra sin respuesta; nunca llegan al worker.

use crate::config::ConfigError;
use crate::http::request::ParseError;
use std::io;
use thiserror::Error;

/// Errores fatales de arranque
#[derive(Debug, Error)]
pub enum ServerError {
    /// Archivo de configuración ausente o inválido
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// No se pudo abrir el puerto de escucha
    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// No se pudieron lanzar los threads del pool
    #[error("cannot start worker pool: {0}")]
    Spawn(#[source] io::Error),
}

/// Errores que terminan una conexión sin enviar respuesta
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// La primera línea no tiene método/target válidos
    #[error("malformed request: {0}")]
    Malformed(#[from] ParseError),

    /// El cliente no envió datos dentro del timeout de lectura
    #[error("idle timeout while reading request")]
    IdleTimeout,

    /// Fallo de lectura/escritura en el socket o en el archivo
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),
}

impl From<io::Error> for ConnectionError {
    /// Un read timeout aparece como `WouldBlock` en Unix y `TimedOut` en Windows
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ConnectionError::IdleTimeout,
            _ => ConnectionError::Transport(err),
        }
    }
}
