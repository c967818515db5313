use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;

/// The terminal belongs to the UI, so logs only go to a daily file.
pub fn get_subscriber(
    debug: bool,
    log_dir: &Path,
) -> (impl tracing::Subscriber + Send + Sync, WorkerGuard) {
    let env_filter = if debug { "trace" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env_filter));

    let file_appender = tracing_appender::rolling::daily(log_dir, "mood_diary.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking);

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(file_log);

    (subscriber, guard)
}

pub fn init_subscriber(debug: bool, log_dir: &Path) -> color_eyre::Result<WorkerGuard> {
    let (subscriber, guard) = get_subscriber(debug, log_dir);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}
