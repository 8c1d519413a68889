//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! El servidor solo produce cuatro códigos:
//!
//! - **200**: el archivo existe y se envía (o solo sus headers, con HEAD)
//! - **403**: el path intenta salir del document root, o falta el index
//! - **404**: el archivo no existe o no se puede abrir
//! - **405**: método reconocido pero distinto de GET/HEAD
//!
//! No hay 1xx, 3xx ni 5xx: los errores internos cierran la conexión sin respuesta.

/// Códigos de estado que puede enviar el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - El archivo se encontró
    Ok = 200,

    /// 403 Forbidden - Traversal detectado o index inaccesible
    Forbidden = 403,

    /// 404 Not Found - Recurso inexistente
    NotFound = 404,

    /// 405 Method Not Allowed - POST, PUT, DELETE u OPTIONS
    MethodNotAllowed = 405,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::StatusCode;
    /// assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }

    /// Solo las respuestas 200 llevan `Content-Type` y `Content-Length`
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
