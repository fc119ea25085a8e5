use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber.
///
/// stderr only shows warnings (debug with `verbose`); the log file gets
/// `file_level`. `RUST_LOG` overrides both. The returned guard flushes the
/// file writer when dropped and must live until the program ends.
pub fn init(file_level: &str, log_file: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(stderr_level.into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_filter(stderr_filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let Some(path) = log_file else {
        let _ = registry.try_init();
        return None;
    };

    let file = match open_log(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            let _ = registry.try_init();
            return None;
        }
    };

    let file_level = parse_level(file_level).unwrap_or(LevelFilter::INFO);
    let file_filter = EnvFilter::builder()
        .with_default_directive(file_level.into())
        .from_env_lossy();

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);

    let _ = registry.with(file_layer).try_init();
    Some(guard)
}

fn open_log(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
