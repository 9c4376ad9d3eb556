//!
//! fedcm-idp binary
//! ----------------
//! Command-line entry point for the reference FedCM identity provider.
//! Configuration comes from environment variables, overridden by CLI flags.

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fedcm_idp::config::{has_flag, IdpConfig, USAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = IdpConfig::from_env_and_args(&args);
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(target: "startup", "RUST_LOG='{}', port={}", rust_log, config.port);

    fedcm_idp::server::run_with_config(config).await
}
