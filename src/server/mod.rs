//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! 1. `tcp`: escucha en un puerto y encola cada conexión aceptada
//! 2. `connection`: un worker atiende la conexión de principio a fin y la cierra

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{Connection, ConnectionHandler, Exchange, IDLE_TIMEOUT};
pub use tcp::Server;
