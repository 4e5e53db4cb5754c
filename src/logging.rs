//! Tracing setup for the binary.
//!
//! Logs go to stderr unless `logging.directory` is set, in which case they
//! are written to `<directory>/cadenza.YYYY-MM-DD` with daily rotation.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cadenza::config::LoggingSettings;

const LOG_FILE_PREFIX: &str = "cadenza";

/// Install the global subscriber. `RUST_LOG` wins over `logging.filter`.
///
/// The returned guard flushes the file writer on drop; keep it alive until exit.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.filter)
            .with_context(|| format!("invalid logging.filter {:?}", settings.filter))?,
    };

    let Some(dir) = &settings.directory else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(directory = %dir.display(), "logging initialized");
    Ok(Some(guard))
}
