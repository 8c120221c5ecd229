// ABOUTME: Tracing subscriber installation for the CLI
// ABOUTME: Filter comes from RUST_LOG, defaulting to info

use tracing_subscriber::EnvFilter;

use warden_config::constants::RUST_LOG;

const DEFAULT_FILTER: &str = "info";

pub fn init_tracing() {
    // stderr keeps stdout clean for printed tokens
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(RUST_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
