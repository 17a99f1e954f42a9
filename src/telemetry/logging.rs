//! Logging configuration and initialization
//!
//! Console logging with tracing, in compact form for development or JSON
//! for log aggregation. Log lines go to stderr so stdout stays clean.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter directive
pub const LOG_FILTER_ENV: &str = "VIDEO_PLAYER_LOG";

/// Environment variable selecting the output format ("json" or anything else)
pub const LOG_FORMAT_ENV: &str = "VIDEO_PLAYER_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Use JSON format for logs (default: false)
    pub json_format: bool,
    /// Default log level filter (default: "info")
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Resolve the output format, letting the environment override the config
    fn use_json(&self, env_value: Option<&str>) -> bool {
        env_value
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(self.json_format)
    }
}

/// Initialize the logging system with the given configuration
///
/// # Environment Variables
///
/// - `VIDEO_PLAYER_LOG`: log level filter (e.g. "debug", "info,video_player=trace")
/// - `VIDEO_PLAYER_LOG_FORMAT`: set to "json" for JSON output
///
/// Falls back to `RUST_LOG`, then to `config.default_level`.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let format_env = std::env::var(LOG_FORMAT_ENV).ok();
    let use_json = config.use_json(format_env.as_deref());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if use_json {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        subscriber.with(json_layer).try_init()?;
    } else {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact();

        subscriber.with(console_layer).try_init()?;
    }

    tracing::info!(
        target: "video_player",
        version = env!("CARGO_PKG_VERSION"),
        json_format = use_json,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert!(!config.json_format);
        assert_eq!(config.default_level, "info");
    }

    #[test]
    fn test_format_env_overrides_config() {
        let config = LogConfig::default();
        assert!(config.use_json(Some("JSON")));
        assert!(!config.use_json(Some("compact")));
        assert!(!config.use_json(None));

        let json_config = LogConfig {
            json_format: true,
            ..LogConfig::default()
        };
        assert!(json_config.use_json(None));
    }
}
