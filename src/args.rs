//! CLI interface for the statement service.

use clap::Parser;
use log::LevelFilter;
use std::net::SocketAddr;

/// statement-pdf: an HTTP service that stores financial statement data and
/// renders it into bank-statement PDF documents.
///
/// The server persists statement rows and report definitions in a SQLite
/// document store and exposes POST endpoints under /api/pdf for storing
/// records and generating PDFs from them. Rendering needs the Roboto font
/// files; see assets/fonts/README.md for where they are looked up.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// The address the HTTP server binds.
    #[arg(long, env = "STATEMENT_PDF_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// The SQLite connection string for the document store. The database file
    /// is created if it does not exist.
    #[arg(
        long,
        env = "STATEMENT_PDF_DATABASE_URL",
        default_value = "sqlite:statement-pdf.sqlite"
    )]
    database_url: String,
}

impl Args {
    pub fn new(log_level: LevelFilter, bind: SocketAddr, database_url: impl Into<String>) -> Self {
        Self {
            log_level,
            bind,
            database_url: database_url.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn bind(&self) -> SocketAddr {
        self.bind
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}
