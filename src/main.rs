//! # Static HTTP Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, abre el puerto y atiende conexiones para siempre.
//! Una configuración inválida o un bind fallido terminan el proceso con
//! código 1.

use clap::Parser;
use static_httpd::config::{Cli, ServerConfig};
use static_httpd::error::ServerError;
use static_httpd::server::{ConnectionHandler, Server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!(error = %e, "fatal startup error");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ServerError> {
    let config = ServerConfig::load(&cli.config)?;
    let root = cli.document_root()?;

    info!(
        config_file = %cli.config.display(),
        port = config.port,
        thread_limit = config.worker_count,
        max_requests_in_queue = config.queue_capacity,
        "configuration loaded"
    );

    let server = Server::new(config, cli.host.as_str(), ConnectionHandler::new(root));
    server.run()
}
