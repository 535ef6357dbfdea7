//! Logging setup.
//!
//! Installs a global tracing subscriber writing to stderr, so stdout stays
//! free for the view. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// `RUST_LOG` or the fallback directive did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to stderr.
///
/// `ansi` toggles colored level names.
pub fn init(ansi: bool) -> Result<(), LoggingError> {
    let env_filter = build_env_filter()?;
    let stderr_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(false)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_env_filter() -> Result<EnvFilter, LoggingError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => Ok(EnvFilter::try_new(directives)?),
        _ => Ok(EnvFilter::try_new(DEFAULT_FILTER)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
