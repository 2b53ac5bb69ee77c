use anyhow::Result;
use gymflow_infrastructure::GymflowPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "gymflow.log";

/// Installs the global subscriber.
///
/// Everything allowed by `RUST_LOG` (or `level`) goes to a daily-rolling file
/// in the logs directory; stderr only shows warnings unless `verbose` is set.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(level: &str, verbose: bool) -> Result<WorkerGuard> {
    let file_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let logs_dir = GymflowPaths::logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;
    let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(stderr_level),
        )
        .init();

    Ok(guard)
}
