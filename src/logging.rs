//! Logging setup
//!
//! The library only emits `tracing` events. Applications that do not install
//! their own subscriber can call [`init_logging`].

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info";

/// Install a global fmt subscriber filtered by `RUST_LOG`
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_logging_with_filter(filter)
}

/// Install a global fmt subscriber with an explicit filter
pub fn init_logging_with_filter(filter: EnvFilter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call installs the subscriber, the next one must fail
        let _ = init_logging_with_filter(EnvFilter::new("corral=debug"));
        assert!(init_logging().is_err());
    }
}
