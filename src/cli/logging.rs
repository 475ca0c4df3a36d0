use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Filter used when `RUST_LOG` is unset or empty.
pub const DEFAULT_LOG_FILTER: &str = "doorway=info";

/// Keeps the filter swappable after the subscriber is installed.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

fn filter_from(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the stderr subscriber. `RUST_LOG` replaces the default filter
/// entirely.
pub fn init_tracing() -> LogHandle {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, handle) = reload::Layer::new(filter_from(rust_log.as_deref()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    LogHandle { filter: handle }
}

impl LogHandle {
    /// Turns logging off when stderr is the terminal the UI is about to
    /// take over. Redirected stderr keeps logging.
    pub fn silence_on_terminal(&self) -> anyhow::Result<()> {
        if std::io::stderr().is_terminal() {
            self.filter.reload(EnvFilter::new("off"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(filter: &EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn test_default_filter_when_unset() {
        assert!(directives(&filter_from(None)).contains("doorway=info"));
        assert!(directives(&filter_from(Some("  "))).contains("doorway=info"));
    }

    #[test]
    fn test_rust_log_replaces_default() {
        let filter = directives(&filter_from(Some("doorway=debug")));
        assert!(filter.contains("doorway=debug"));
        assert!(!filter.contains("doorway=info"));
    }
}
