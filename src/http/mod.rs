//! # Módulo HTTP
//! src/http/mod.rs
//!
//! El subconjunto mínimo de HTTP que necesita un servidor de archivos:
//!
//! - Lectura de la cabecera del request y parsing de la primera línea
//! - Construcción de la cabecera de respuesta y envío del body por bloques
//! - Los cuatro códigos de estado que produce el servidor
//! - Content-Type a partir de la extensión del archivo
//!
//! No hay keep-alive, chunked transfer ni bodies en los requests: cada
//! conexión recibe exactamente una respuesta y se cierra.

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, Request};
pub use response::ResponseWriter;
pub use status::StatusCode;
