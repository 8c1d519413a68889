//! # Escritura de Respuestas HTTP
//! src/http/response.rs
//!
//! La cabecera se arma a mano y el body se copia desde el archivo en
//! bloques de tamaño fijo, sin cargarlo completo en memoria.
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: static_httpd\r\n
//! Connection: close\r\n
//! Date: Mon, 19 Oct 2026 10:00:00 GMT\r\n
//! Accept-Ranges: none\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>hola</h1>
//! ```

use super::StatusCode;
use std::io::{self, Read, Write};
use std::time::SystemTime;

/// Tamaño de cada bloque del body
pub const CHUNK_SIZE: usize = 2048;

/// Valor del header `Server`
pub const SERVER_NAME: &str = "static_httpd";

/// Construye el bloque de headers (incluida la línea vacía final)
///
/// `Content-Type` y `Content-Length` solo se agregan para 200, y solo si
/// tienen valor (tipo no vacío, longitud distinta de cero).
pub fn build_header(status: StatusCode, content_type: Option<&str>, content_length: u64) -> String {
    let mut header = format!("HTTP/1.1 {}\r\n", status);

    header.push_str(&format!("Server: {}\r\n", SERVER_NAME));
    header.push_str("Connection: close\r\n");
    header.push_str(&format!("Date: {}\r\n", httpdate::fmt_http_date(SystemTime::now())));
    header.push_str("Accept-Ranges: none\r\n");

    if status.is_success() {
        if let Some(content_type) = content_type.filter(|t| !t.is_empty()) {
            header.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        if content_length != 0 {
            header.push_str(&format!("Content-Length: {}\r\n", content_length));
        }
    }

    header.push_str("\r\n");
    header
}

/// Escribe la respuesta de una conexión
pub struct ResponseWriter<W: Write> {
    out: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Envía la línea de estado y los headers
    pub fn send_header(
        &mut self,
        status: StatusCode,
        content_type: Option<&str>,
        content_length: u64,
    ) -> io::Result<()> {
        let header = build_header(status, content_type, content_length);
        self.out.write_all(header.as_bytes())?;
        self.out.flush()
    }

    /// Copia `source` a la conexión en bloques de [`CHUNK_SIZE`]
    ///
    /// Retorna la cantidad de bytes enviados.
    pub fn send_body<R: Read>(&mut self, mut source: R) -> io::Result<u64> {
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut sent = 0u64;

        loop {
            let count = match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            self.out.write_all(&buffer[..count])?;
            sent += count as u64;
        }

        self.out.flush()?;
        Ok(sent)
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_text(status: StatusCode, content_type: Option<&str>, len: u64) -> String {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.send_header(status, content_type, len).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_ok_header() {
        let text = header_text(StatusCode::Ok, Some("text/plain"), 4);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.contains("Accept-Ranges: none\r\n"));
        assert!(text.contains("Date: "));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_date_header_is_http_date() {
        let text = header_text(StatusCode::Ok, None, 0);
        let date = text
            .lines()
            .find_map(|line| line.strip_prefix("Date: "))
            .unwrap();

        assert!(httpdate::parse_http_date(date).is_ok());
    }

    #[test]
    fn test_error_headers_have_no_content_headers() {
        for status in [StatusCode::Forbidden, StatusCode::NotFound, StatusCode::MethodNotAllowed] {
            let text = header_text(status, Some("text/html"), 100);

            assert!(text.starts_with(&format!("HTTP/1.1 {}\r\n", status)));
            assert!(!text.contains("Content-Type"));
            assert!(!text.contains("Content-Length"));
        }
    }

    #[test]
    fn test_empty_type_and_zero_length_are_omitted() {
        let text = header_text(StatusCode::Ok, Some(""), 0);
        assert!(!text.contains("Content-Type"));
        assert!(!text.contains("Content-Length"));

        let text = header_text(StatusCode::Ok, None, 7);
        assert!(!text.contains("Content-Type"));
        assert!(text.contains("Content-Length: 7\r\n"));
    }

    #[test]
    fn test_send_body_copies_everything_in_chunks() {
        // Más de dos bloques, último incompleto
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();

        let mut writer = ResponseWriter::new(Vec::new());
        let sent = writer.send_body(&data[..]).unwrap();

        assert_eq!(sent, data.len() as u64);
        assert_eq!(writer.into_inner(), data);
    }

    #[test]
    fn test_send_body_empty_source() {
        let mut writer = ResponseWriter::new(Vec::new());
        assert_eq!(writer.send_body(io::empty()).unwrap(), 0);
        assert!(writer.into_inner().is_empty());
    }
}
