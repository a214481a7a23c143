use std::env;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Log output format, selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Full,
    Compact,
}

impl LogFormat {
    /// Reads `LOG_FORMAT` (`full` or `compact`); anything else means `full`.
    fn from_env() -> Self {
        match env::var("LOG_FORMAT") {
            Ok(format) if format.eq_ignore_ascii_case("compact") => LogFormat::Compact,
            _ => LogFormat::Full,
        }
    }
}

/// Local logging setup for the CLI.
///
/// Logs go to stderr so the JSON written to stdout stays machine-readable.
pub struct Telemetry {
    filter: EnvFilter,
    format: LogFormat,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    /// Builds the filter from `RUST_LOG`, falling back to `warn`.
    pub fn new() -> Self {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        Self {
            filter,
            format: LogFormat::from_env(),
        }
    }

    /// Raises the filter to `debug` for this crate and the codec.
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.filter = EnvFilter::new("pocketbroker_qr=debug,pocketbroker_eip681=debug");
        }
        self
    }

    /// Installs the global subscriber.
    pub fn register(self) {
        let registry = tracing_subscriber::registry().with(self.filter);
        match self.format {
            LogFormat::Full => registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init(),
            LogFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init(),
        }
        tracing::debug!(format = ?self.format, "logging initialized");
    }
}
