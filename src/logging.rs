//! Optional `tracing` subscriber setup for hosts and demos.
//!
//! The library only emits events through `tracing`. Installing a subscriber is
//! the host's decision, this helper is the common case.

use tracing_subscriber::EnvFilter;

use crate::error::UiError;

/// Install a formatting subscriber filtered by `RUST_LOG`, or `default_filter`
/// when the variable is unset or invalid (e.g. `"blockui=debug"`).
pub fn init(default_filter: &str) -> Result<(), UiError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| UiError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_error() {
        // The first call may race with other tests; only the second is deterministic.
        let _ = init("blockui=warn");
        assert!(matches!(init("blockui=warn"), Err(UiError::Logging(_))));
    }
}
