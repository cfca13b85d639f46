use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match &config.file_path {
        Some(file_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)
                .with_context(|| format!("Failed to open log file {}", file_path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let fmt_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_thread_ids(true)
        .with_writer(writer);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format.as_str() {
        "json" => fmt_layer.json().boxed(),
        _ => fmt_layer.boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(env_filter))
        .try_init()
        .context("Global tracing subscriber already installed")?;

    tracing::info!("Logging initialized with level: {}", config.level);
    Ok(())
}

#[macro_export]
macro_rules! log_warn {
    ($msg:expr) => {
        tracing::warn!($msg);
    };
    ($msg:expr, $($field:tt)*) => {
        tracing::warn!($msg, $($field)*);
    };
}

#[macro_export]
macro_rules! log_debug {
    ($msg:expr) => {
        tracing::debug!($msg);
    };
    ($msg:expr, $($field:tt)*) => {
        tracing::debug!($msg, $($field)*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_to_file() {
        let path = std::env::temp_dir().join(format!("vivae-utils-{}.log", std::process::id()));
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "text".to_string(),
            file_path: Some(path.to_string_lossy().into_owned()),
        };

        init_logging(&config).unwrap();
        assert!(path.exists());

        // A second subscriber cannot be installed
        assert!(init_logging(&config).is_err());
        let _ = std::fs::remove_file(path);
    }
}
