//! Structured logging setup
//!
//! Every log line is JSON. Fields of the enclosing spans are flattened into the
//! line, so the `requestId` span opened by the correlation middleware tags all
//! output produced while a request is handled, including audit warnings.

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Build the log filter from `RUST_LOG`, else the configured level, else `info`
pub fn env_filter(config: &Config) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(rust_log.as_deref(), &config.service.log_level)
}

fn filter_from(rust_log: Option<&str>, log_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Initialize JSON tracing output
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing(config: &Config) -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_env_filter(env_filter(config))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Tracing initialized for service: {}", config.service.name);
    }

    Ok(())
}
