use anyhow::Context;
use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);

/// Keeps the non-blocking file writer alive; drop it last.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Normalise a configured level, falling back to `info` for anything unknown.
fn normalize_level(level: &str) -> &str {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    }
}

pub fn init_logging(
    log_dir: impl AsRef<Path>,
    prefix: &str,
    level: &str,
) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref();
    let effective = normalize_level(level);

    let builder = EnvFilter::builder().with_default_directive(
        effective
            .parse()
            .with_context(|| format!("Invalid log level '{}'", effective))?,
    );

    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create log appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    // stdout carries the pass lines, so console logging goes to stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if effective != level {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    if let Err(e) = cleanup_old_logs(log_dir, prefix, MAX_LOG_AGE) {
        tracing::warn!("Failed to delete old log file: {}", e);
    }

    Ok(LoggerGuard(guard))
}

/// Whether `file_name` is one of our rolled log files.
fn is_own_log(file_name: &str, prefix: &str) -> bool {
    file_name.starts_with(prefix) && file_name.ends_with(".log")
}

/// Delete rolled log files older than `max_age`; returns how many went.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut stale = Vec::new();
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_own_log(name, prefix) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if modified < cutoff {
            stale.push(entry.path());
        }
    }

    for path in &stale {
        fs::remove_file(path)?;
        tracing::info!("Old log file deleted: {}", path.display());
    }
    Ok(stale.len())
}
