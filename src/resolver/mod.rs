//! # Resolución de Paths
//! src/resolver/mod.rs
//!
//! Convierte el target de un request en un path dentro del document root,
//! o en un rechazo (403/404). No toca el filesystem: la existencia del
//! archivo se verifica después, al abrirlo.
//!
//! ## Pasos
//!
//! 1. Decodificar `%XX`
//! 2. Target terminado en `/`: sin punto es un directorio y se sirve su
//!    `index.html`; con punto se responde 404
//! 3. Quitar la query (`?` en adelante)
//! 4. Heurística de traversal: contar los `/..` y los `/` del target; si
//!    `barras - 2 * puntos < 0` se responde 403
//! 5. Unir con el document root sin permitir que `..` suba por encima de él

use crate::http::StatusCode;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Documento por defecto para targets de directorio
pub const INDEX_DOCUMENT: &str = "index.html";

/// Path validado, siempre dentro del document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
    index: bool,
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` si apunta al documento index. Si no se puede abrir, la
    /// respuesta es 403 en lugar de 404 (nunca se listan directorios).
    pub fn is_index(&self) -> bool {
        self.index
    }
}

/// Resultado de resolver un target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    File(ResolvedPath),
    Reject(StatusCode),
}

/// Resuelve targets contra un document root fijo
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resuelve un target sin decodificar
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::StatusCode;
    /// use static_httpd::resolver::{PathResolver, Resolution};
    ///
    /// let resolver = PathResolver::new("/srv/www");
    ///
    /// match resolver.resolve("/docs/") {
    ///     Resolution::File(resolved) => {
    ///         assert_eq!(resolved.path(), std::path::Path::new("/srv/www/docs/index.html"));
    ///     }
    ///     other => panic!("unexpected: {:?}", other),
    /// }
    /// assert_eq!(
    ///     resolver.resolve("/../../etc/passwd"),
    ///     Resolution::Reject(StatusCode::Forbidden)
    /// );
    /// ```
    pub fn resolve(&self, raw_target: &str) -> Resolution {
        let decoded = percent_decode_str(raw_target).decode_utf8_lossy();

        if decoded.ends_with('/') {
            if decoded.contains('.') {
                return Resolution::Reject(StatusCode::NotFound);
            }
            return match self.join(&decoded) {
                Some(dir) => Resolution::File(ResolvedPath {
                    path: dir.join(INDEX_DOCUMENT),
                    index: true,
                }),
                None => Resolution::Reject(StatusCode::Forbidden),
            };
        }

        let target = match decoded.find('?') {
            Some(query_start) => &decoded[..query_start],
            None => &decoded[..],
        };

        if exceeds_parent_budget(target) {
            return Resolution::Reject(StatusCode::Forbidden);
        }

        match self.join(target) {
            Some(path) => {
                let index = path.file_name().is_some_and(|name| name == INDEX_DOCUMENT);
                Resolution::File(ResolvedPath { path, index })
            }
            None => Resolution::Reject(StatusCode::Forbidden),
        }
    }

    /// Une el target con el root normalizando `.` y `..` léxicamente
    ///
    /// Retorna `None` si algún `..` sube por encima del root.
    fn join(&self, target: &str) -> Option<PathBuf> {
        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

        for component in Path::new(target.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        let mut path = self.root.clone();
        path.extend(parts);
        Some(path)
    }
}

/// Heurística de conteo: `true` si hay más `/..` de los que las barras
/// del target permiten subir
///
/// Las barras se cuentan sobre el target completo, antes de quitar los
/// `/..`. Solo aplica si aparece al menos un `/..`.
fn exceeds_parent_budget(target: &str) -> bool {
    let parent_count = target.matches("/..").count() as isize;
    if parent_count == 0 {
        return false;
    }

    let slash_count = target.matches('/').count() as isize;
    slash_count - 2 * parent_count < 0
}
