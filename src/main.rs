//! XYZ Virtual Assistant server
//!
//! Entry point: loads configuration, installs tracing and serves the chat UI.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use xyz_assistant::{config::AppConfig, server, telemetry};

#[tokio::main]
async fn main() {
    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenvy::dotenv();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init(config.logging.format);

    if let Err(e) = server::start_server(Arc::new(config)).await {
        tracing::error!(name: "server.failed", error = ?e, "Server exited with error");
        std::process::exit(1);
    }
}
