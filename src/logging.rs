//! File logging. The terminal belongs to the dashboard, so log records go to
//! a file in the cache directory, and only when a level other than `off` is set.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use flixdash_cli::LogLevel;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cache::CacheManager;

/// Environment variable holding an EnvFilter directive, e.g. `flixdash=debug`
pub const LOG_ENV: &str = "FLIXDASH_LOG";

/// Effective filter directive: command line, then environment, then config.
pub fn resolve_level(cli: Option<LogLevel>, env: Option<String>, config: &str) -> String {
    if let Some(level) = cli {
        return level.as_str().to_string();
    }
    match env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => config.to_string(),
    }
}

/// Install the global subscriber. Returns the guard that flushes the
/// background writer on drop; keep it alive for the whole session.
pub fn init(cache: &CacheManager, level: &str, file_name: &str) -> Result<Option<WorkerGuard>> {
    if level.trim().eq_ignore_ascii_case("off") {
        return Ok(None);
    }

    cache.ensure_cache_dir()?;
    let appender = tracing_appender::rolling::never(cache.cache_dir(), file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .with_level(true)
            .with_target(true),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("Failed to set global tracing subscriber: {e}"))?;

    tracing::info!(
        log_file = %cache.cache_file(file_name).display(),
        "logging started"
    );
    Ok(Some(guard))
}
