//! # Lectura y Parsing de Requests
//! src/http/request.rs
//!
//! ## Formato esperado
//!
//! ```text
//! GET /docs/index.html HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! Se lee la cabecera completa (hasta la línea vacía o el fin del stream),
//! pero solo la primera línea tiene significado: el método es el texto
//! antes del primer espacio y el target el texto entre el primer y el
//! segundo espacio. Los headers se descartan y nunca se lee un body.

use crate::error::ConnectionError;
use std::io::{BufRead, Read};
use std::str::FromStr;
use thiserror::Error;

/// Tamaño máximo de la cabecera de un request
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Métodos HTTP reconocidos por el parser
///
/// Solo GET y HEAD se atienden; el resto se responde con 405.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
        }
    }

    /// `true` para los métodos que sirven archivos (GET y HEAD)
    pub fn is_servable(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores de parsing: la conexión se cierra sin respuesta
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// El cliente no envió ninguna línea
    #[error("empty request")]
    EmptyRequest,

    /// La primera línea no tiene dos espacios
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// Método fuera de GET, POST, PUT, DELETE, HEAD, OPTIONS
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// La cabecera supera [`MAX_HEAD_BYTES`]
    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),
}

/// Request ya parseado. Inmutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,

    /// Target tal como llegó (sin decodificar), ej: "/docs/a%20b.html?x=1"
    target: String,
}

impl Request {
    /// Lee la cabecera y la parsea en un solo paso
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ConnectionError> {
        let head = read_head(reader)?;
        Ok(Self::parse(&head)?)
    }

    /// Parsea la cabecera ya leída (líneas separadas por `\n`)
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_httpd::http::{Method, Request};
    ///
    /// let request = Request::parse("HEAD /style.css HTTP/1.1\nHost: x\n").unwrap();
    /// assert_eq!(request.method(), Method::HEAD);
    /// assert_eq!(request.target(), "/style.css");
    /// ```
    pub fn parse(head: &str) -> Result<Self, ParseError> {
        let request_line = head.lines().next().unwrap_or("");
        if request_line.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let invalid = || ParseError::InvalidRequestLine(request_line.to_string());

        let (method, rest) = request_line.split_once(' ').ok_or_else(invalid)?;
        let method = method.parse::<Method>()?;

        let (target, _) = rest.split_once(' ').ok_or_else(invalid)?;

        Ok(Request {
            method,
            target: target.to_string(),
        })
    }

    /// Método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Target sin decodificar
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Lee líneas hasta una línea vacía o el fin del stream
///
/// Acepta `\n` o `\r\n` como terminador. Retorna todas las líneas leídas
/// concatenadas con `\n`. Los bytes que no son UTF-8 se reemplazan.
pub fn read_head<R: BufRead>(reader: &mut R) -> Result<String, ConnectionError> {
    let mut head = String::new();
    let mut line = Vec::new();
    let mut total = 0usize;

    loop {
        line.clear();

        // Se permite un byte de más para detectar el desborde
        let remaining = (MAX_HEAD_BYTES - total + 1) as u64;
        let read = reader.by_ref().take(remaining).read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }

        total += read;
        if total > MAX_HEAD_BYTES {
            return Err(ParseError::HeadTooLarge(MAX_HEAD_BYTES).into());
        }

        let text = String::from_utf8_lossy(&line);
        let text = text.trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            break;
        }

        head.push_str(text);
        head.push('\n');
    }

    Ok(head)
}
