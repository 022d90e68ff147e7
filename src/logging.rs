//! Tracing subscriber setup for the command-line tool

use crate::config::{LogFormat, SamlConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// leaves the first subscriber in place.
pub fn init_logging(config: &SamlConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(level = %config.log_level, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = SamlConfig::default().with_log_level("warn");
        init_logging(&config);
        init_logging(&config.with_log_format(LogFormat::Json));
    }
}
