use std::sync::Once;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "CLIPFX_LOG";

/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "warn,clipfx_engine=info,clipfx_preview=info";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "clipfx_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Prefix records with a millisecond timestamp.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, `CLIPFX_LOG`, `RUST_LOG`, then
/// [`DEFAULT_FILTER`]. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = resolve_filter(
            config.env_filter,
            std::env::var(LOG_ENV).ok(),
            std::env::var("RUST_LOG").ok(),
        );
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        if config.timestamps {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        // Another logger may already be installed by the host.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized ({filter})");
    });
}

fn resolve_filter(explicit: Option<String>, ours: Option<String>, rust_log: Option<String>) -> String {
    [explicit, ours, rust_log]
        .into_iter()
        .flatten()
        .find(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let f = resolve_filter(Some("debug".into()), Some("info".into()), Some("trace".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn own_variable_beats_rust_log() {
        assert_eq!(resolve_filter(None, Some("info".into()), Some("trace".into())), "info");
        assert_eq!(resolve_filter(None, Some("  ".into()), Some("trace".into())), "trace");
    }

    #[test]
    fn default_when_unset() {
        assert_eq!(resolve_filter(None, None, None), DEFAULT_FILTER);
    }
}
