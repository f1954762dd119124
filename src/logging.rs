//! Logging initialization. The terminal belongs to the UI, so events go to a
//! rolling file only.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Returns a guard that must be kept alive for the duration of the program.
/// `None` when no log directory is available or it cannot be created.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let dir = log_dir?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Logging disabled: cannot create {} ({})", dir.display(), e);
        return None;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::daily(dir, "multiwall.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Some(guard)
}
