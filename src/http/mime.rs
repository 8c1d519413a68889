//! # Tipos MIME
//! src/http/mime.rs
//!
//! Tres extensiones tienen un tipo fijo; el resto se adivina con `mime_guess`.

use std::path::Path;

/// Tabla fija, consultada antes que `mime_guess`
const FIXED_TYPES: &[(&str, &str)] = &[
    ("swf", "application/x-shockwave-flash"),
    ("css", "text/css"),
    ("js", "text/javascript"),
];

/// Content-Type para un archivo, o `None` si no se reconoce la extensión
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?;

    FIXED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .or_else(|| mime_guess::from_ext(extension).first_raw())
}
