//! # Configuración del Servidor
//! src/config.rs
//!
//! Dos fuentes:
//!
//! - **CLI / variables de entorno** ([`Cli`]): dónde está el archivo de
//!   configuración, en qué host escuchar y qué directorio servir.
//! - **Archivo de propiedades** ([`ServerConfig`]): puerto, cantidad de
//!   workers y capacidad de la cola. Las tres claves son obligatorias; las
//!   demás se ignoran.
//!
//! ## Ejemplo de archivo (`etc/httpd.conf`)
//!
//! ```text
//! # comentario
//! port=8080
//! thread_limit: 4
//! max_requests_in_queue 64
//! document_root=/var/www/html
//! ```
//!
//! El separador puede ser `=`, `:` o espacios. Líneas que empiezan con `#`
//! o `!` son comentarios, y una `\` al final de la línea la continúa en la
//! siguiente.
//!
//! ## CLI
//! ```bash
//! ./static_httpd --config etc/httpd.conf --root ./public
//! HTTPD_HOST=127.0.0.1 ./static_httpd
//! ```

use clap::Parser;
use serde::Deserialize;
use std::io;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use thiserror::Error;

/// Argumentos de línea de comandos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_httpd")]
#[command(about = "Servidor HTTP de archivos estáticos con pool fijo de workers")]
#[command(version)]
pub struct Cli {
    /// Archivo con port, thread_limit y max_requests_in_queue
    #[arg(short, long, default_value = "etc/httpd.conf", env = "HTTPD_CONFIG")]
    pub config: PathBuf,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTPD_HOST")]
    pub host: String,

    /// Directorio a servir (por defecto, el directorio actual)
    #[arg(long, env = "HTTPD_ROOT")]
    pub root: Option<PathBuf>,
}

impl Cli {
    /// Document root: `--root` o el directorio de trabajo al arrancar
    pub fn document_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(ConfigError::DocumentRoot),
        }
    }
}

/// Errores de configuración. Todos son fatales al arrancar.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Clave faltante o valor no numérico
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Escape `\uXXXX` mal formado
    #[error("line {line}: malformed \\uXXXX escape")]
    Escape { line: usize },

    #[error("{0}")]
    Invalid(String),

    #[error("cannot determine document root: {0}")]
    DocumentRoot(#[source] io::Error),
}

/// Parámetros del servidor, inmutables durante toda la ejecución
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Puerto TCP
    pub port: u16,

    /// Cantidad fija de workers
    #[serde(rename = "thread_limit")]
    pub worker_count: usize,

    /// Conexiones que pueden esperar a un worker
    #[serde(rename = "max_requests_in_queue")]
    pub queue_capacity: usize,
}

impl ServerConfig {
    /// Lee y valida el archivo de configuración
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Parsea y valida el contenido de un archivo de propiedades
    ///
    /// Cada valor entero pasa como número y el resto como texto, así que
    /// un valor no numérico en una de las tres claves es un error.
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::config::ServerConfig;
    ///
    /// let text = "port=8080\nthread_limit 4\nmax_requests_in_queue:16\n";
    /// let config = ServerConfig::parse(text).unwrap();
    /// assert_eq!(config.worker_count, 4);
    /// assert_eq!(config.queue_capacity, 16);
    /// ```
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut table = toml::Table::new();
        for (key, value) in parse_properties(text)? {
            table.insert(key, property_value(value));
        }

        let config = ServerConfig::deserialize(toml::Value::Table(table))?;
        config.validate()?;
        Ok(config)
    }

    /// Valida que los tres valores sean positivos
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("thread_limit must be >= 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("max_requests_in_queue must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Dirección para bind (host:port)
    pub fn address(&self, host: &str) -> String {
        format!("{}:{}", host, self.port)
    }
}

/// Separa un archivo de propiedades en pares clave/valor, en orden
///
/// Una clave repetida aparece varias veces; al insertarlas en una tabla
/// gana la última.
fn parse_properties(text: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut pairs = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let mut logical = line.trim_start_matches(is_blank).to_string();
        if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
            continue;
        }

        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let pair = split_pair(&logical).ok_or(ConfigError::Escape { line: index + 1 })?;
        pairs.push(pair);
    }

    Ok(pairs)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Cantidad impar de `\` al final: la última escapa el salto de línea
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// La clave termina en el primer `=`, `:` o espacio sin escapar
fn split_pair(line: &str) -> Option<(String, String)> {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    let mut separator = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escaped(&mut key, &mut chars)?,
            '=' | ':' => {
                separator = true;
                break;
            }
            c if is_blank(c) => break,
            c => key.push(c),
        }
    }

    while chars.next_if(|&c| is_blank(c)).is_some() {}
    if !separator && chars.next_if(|&c| c == '=' || c == ':').is_some() {
        while chars.next_if(|&c| is_blank(c)).is_some() {}
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escaped(&mut value, &mut chars)?,
            c => value.push(c),
        }
    }

    Some((key, value))
}

/// Agrega el carácter escapado que sigue a una `\`
fn push_escaped(out: &mut String, chars: &mut Peekable<Chars<'_>>) -> Option<()> {
    match chars.next() {
        Some('t') => out.push('\t'),
        Some('n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('f') => out.push('\x0c'),
        Some('u') => {
            let hex: String = chars.by_ref().take(4).collect();
            if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)?);
        }
        Some(c) => out.push(c),
        None => {}
    }
    Some(())
}

/// Enteros como número (ignorando espacios finales), el resto como texto
fn property_value(raw: String) -> toml::Value {
    match raw.trim_end().parse::<i64>() {
        Ok(number) => toml::Value::Integer(number),
        Err(_) => toml::Value::String(raw),
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            worker_count: 4,
            queue_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties_style_file() {
        let text = "port=80\nthread_limit=8\nmax_requests_in_queue=100\n";
        let config = ServerConfig::parse(text).unwrap();

        assert_eq!(
            config,
            ServerConfig {
                port: 80,
                worker_count: 8,
                queue_capacity: 100,
            }
        );
    }

    #[test]
    fn test_parse_with_comments_spaces_and_extra_keys() {
        let text = "# httpd config\n! otro comentario\n\n  port = 3000\nthread_limit = 2\n\
                    max_requests_in_queue = 5\ndocument_root = \"/var/www\"\n";
        let config = ServerConfig::parse(text).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.queue_capacity, 5);
    }

    #[test]
    fn test_parse_space_and_colon_separators() {
        let text = "port 8080\nthread_limit:4\nmax_requests_in_queue  :  16\n\
                    document_root=/var/www/html\nserver.name My Server\n";
        let config = ServerConfig::parse(text).unwrap();

        assert_eq!(
            config,
            ServerConfig {
                port: 8080,
                worker_count: 4,
                queue_capacity: 16,
            }
        );
    }

    #[test]
    fn test_parse_continuation_and_last_key_wins() {
        let text = "port=80\\\n   81\nthread_limit=1\nthread_limit=3\nmax_requests_in_queue=2\n";
        let config = ServerConfig::parse(text).unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.worker_count, 3);
    }

    #[test]
    fn test_trailing_whitespace_after_number() {
        let text = "port=8080  \r\nthread_limit=2\r\nmax_requests_in_queue=2\r\n";
        let config = ServerConfig::parse(text).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_split_pair_rules() {
        let pair = |line: &str| split_pair(line).unwrap();

        assert_eq!(pair("key=value"), ("key".to_string(), "value".to_string()));
        assert_eq!(pair("key = a = b"), ("key".to_string(), "a = b".to_string()));
        assert_eq!(pair("key"), ("key".to_string(), String::new()));
        assert_eq!(pair("a\\:b:c"), ("a:b".to_string(), "c".to_string()));
        assert_eq!(pair("path=C:\\\\www"), ("path".to_string(), "C:\\www".to_string()));
        assert_eq!(pair("k=\\u0041"), ("k".to_string(), "A".to_string()));
        assert!(split_pair("k=\\u00").is_none());
    }

    #[test]
    fn test_malformed_escape_is_error() {
        let result = ServerConfig::parse("port=8080\nname=\\uZZZZ\n");
        assert!(matches!(result, Err(ConfigError::Escape { line: 2 })));
    }

    #[test]
    fn test_missing_key_is_error() {
        let result = ServerConfig::parse("port=8080\nthread_limit=4\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_value_is_error() {
        let result = ServerConfig::parse("port=abc\nthread_limit=4\nmax_requests_in_queue=1\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let result = ServerConfig::parse("port=8080\nthread_limit=-1\nmax_requests_in_queue=1\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_values_are_invalid() {
        for (text, key) in [
            ("port=0\nthread_limit=1\nmax_requests_in_queue=1", "port"),
            ("port=1\nthread_limit=0\nmax_requests_in_queue=1", "thread_limit"),
            ("port=1\nthread_limit=1\nmax_requests_in_queue=0", "max_requests_in_queue"),
        ] {
            match ServerConfig::parse(text) {
                Err(ConfigError::Invalid(message)) => assert!(message.contains(key)),
                other => panic!("expected invalid {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("httpd.conf");
        std::fs::write(&path, "port=9090\nthread_limit=3\nmax_requests_in_queue=7\n").unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ServerConfig::load(Path::new("/definitely/not/here/httpd.conf"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_address() {
        let config = ServerConfig::default();
        assert_eq!(config.address("127.0.0.1"), "127.0.0.1:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["static_httpd"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("etc/httpd.conf"));
        assert!(cli.root.is_none());
        assert_eq!(cli.document_root().unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "static_httpd",
            "--config",
            "/etc/custom.conf",
            "--host",
            "127.0.0.1",
            "--root",
            "/srv/www",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/custom.conf"));
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.document_root().unwrap(), PathBuf::from("/srv/www"));
    }
}
