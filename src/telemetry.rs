//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events. Binaries and test harnesses that
//! embed it call [`init_tracing`] once at startup to print them; library code
//! never installs a subscriber itself.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive is malformed.
    #[error("invalid filter directive '{directive}': {reason}")]
    InvalidDirective {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (for example `"taskpad=info"`) when unset.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidDirective`] when the fallback cannot be
/// parsed and [`TelemetryError::Install`] when a subscriber is already set.
pub fn init_tracing(default_directive: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|err| {
            TelemetryError::InvalidDirective {
                directive: default_directive.to_owned(),
                reason: err.to_string(),
            }
        })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}
