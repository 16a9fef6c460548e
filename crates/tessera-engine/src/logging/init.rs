use std::sync::Once;

use log::LevelFilter;

/// Settings for the process-wide `env_logger` instance.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives such as `"tessera_engine::canvas=trace"`.
    /// Takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,

    /// Level used when neither `env_filter` nor `RUST_LOG` is set. wgpu's own
    /// crates are capped at `warn` in that case.
    pub default_level: LevelFilter,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger; only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(directives) => {
                builder.parse_filters(&directives);
            }
            None => {
                builder
                    .filter_level(config.default_level)
                    .filter_module("wgpu_core", LevelFilter::Warn)
                    .filter_module("wgpu_hal", LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style).init();
        log::debug!("logging initialized");
    });
}
