//! Tracing configuration for docdesk
//!
//! - **stderr layer**: always on, so command output on stdout stays clean
//! - **file layer**: optional, `<data dir>/docdesk/logs/docdesk.log`, daily rotation
//! - **filter**: `RUST_LOG` wins; otherwise debug in dev builds, info in release

use std::{fs, io, path::PathBuf, sync::OnceLock};

use anyhow::Context;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug for our crates
/// - **Production**: info for our crates
/// - HTTP client internals stay at warn either way
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
        format!("dd_infra={level}"),
        format!("dd_app={level}"),
    ]
}

/// `<data dir>/docdesk/logs`
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("docdesk").join("logs"))
}

/// Initialize the tracing subscriber
///
/// Call once, after the config is loaded and before any use case runs.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered. A file layer
/// that cannot be created is reported on stderr and skipped.
pub fn init_tracing_subscriber(log_to_file: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_directives(is_development()).join(",")));

    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(BoxMakeWriter::new(io::stderr));

    let file_writer = if log_to_file {
        match build_file_writer() {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("Failed to initialize file logging, continuing without it: {err:#}");
                None
            }
        }
    } else {
        None
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to register tracing subscriber")?;

    Ok(())
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let dir = logs_dir().context("No data directory on this platform")?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&dir, "docdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev_directives = build_filter_directives(true);
        assert_eq!(dev_directives[0], "debug");
        assert!(dev_directives.contains(&"dd_infra=debug".to_string()));
        assert!(dev_directives.contains(&"reqwest=warn".to_string()));

        let prod_directives = build_filter_directives(false);
        assert_eq!(prod_directives[0], "info");
        assert!(prod_directives.contains(&"dd_app=info".to_string()));
    }

    #[test]
    fn test_directives_parse_as_env_filter() {
        let joined = build_filter_directives(false).join(",");
        assert!(EnvFilter::try_new(joined).is_ok());
    }
}
