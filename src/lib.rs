//! # Static HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP mínimo de archivos estáticos: acepta conexiones TCP,
//! parsea la primera línea del request, resuelve el path dentro del
//! document root y envía el archivo con una cabecera armada a mano.
//!
//! ## Arquitectura
//!
//! - `http`: parsing del request, escritura de la respuesta, status codes
//! - `resolver`: target -> path seguro dentro del document root
//! - `server`: listener TCP y ciclo de vida de cada conexión
//! - `workers`: pool fijo de threads y cola acotada con backpressure
//! - `config`: CLI y archivo de propiedades
//! - `error`: errores fatales y errores por conexión
//!
//! ```text
//! accept() -> enqueue(conn) [bloquea si la cola está llena]
//!          -> worker: dequeue -> parse -> resolve -> respond -> close
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_httpd::config::ServerConfig;
//! use static_httpd::server::{ConnectionHandler, Server};
//!
//! let config = ServerConfig::default();
//! let server = Server::new(config, "127.0.0.1", ConnectionHandler::new("./public"));
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod resolver;
pub mod server;
pub mod workers;
