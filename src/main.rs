use clap::Parser;
use log::LevelFilter;
use statement_pdf::args::Args;
use statement_pdf::http::Api;
use statement_pdf::pdf::{StatementRenderer, StatementStyle};
use statement_pdf::store::Store;
use statement_pdf::Result;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn main_inner(args: Args) -> Result<()> {
    let store = Store::connect(args.database_url()).await?;
    let api = Api::new(store, StatementRenderer::new(StatementStyle::new()));
    api.serve(args.bind()).await
}

/// Initializes the tracing subscriber. The renderer logs through the `log`
/// facade; the subscriber's log bridge picks those events up as well.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the default log level for this
            // crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
