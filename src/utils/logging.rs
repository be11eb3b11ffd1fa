use log::{Level, LevelFilter, SetLoggerError};
use env_logger::{Builder, Target};
use std::env;
use std::io::Write;
use uuid::Uuid;

use crate::models::CalendarView;

/// Prefix carried by every message the widget logs.
pub const LOG_PREFIX: &str = "Calendar widget:";

/// Where hosts find migration notes for deprecated options.
pub const CHANGELOG_LINK: &str = "CHANGELOG.md";

fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs an `env_logger` backend for hosts that have none.
pub fn init_logging() -> Result<(), SetLoggerError> {
    let env = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level = parse_level(&env);

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();

        match record.level() {
            Level::Info => {
                writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args())
            }
            level => {
                let file = record.file().unwrap_or("unknown");
                let line = record.line().unwrap_or(0);
                writeln!(buf,
                    "{} [{}] [{}:{}] {}: {}",
                    timestamp, level, file, line, target, record.args()
                )
            }
        }
    });

    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.filter_module("hyper", LevelFilter::Warn);
    }

    builder.filter_level(log_level)
           .target(Target::Stdout)
           .try_init()
}

pub fn log_error_with_context(error: &anyhow::Error, context: &str) {
    log::error!("{} {} {}", LOG_PREFIX, context, error);

    let mut source = error.source();
    while let Some(err) = source {
        log::error!("  Caused by: {}", err);
        source = err.source();
    }
}

pub fn log_template_load(instance: Uuid, parts: usize, duration_ms: u64) {
    log::debug!("{} [{}] loaded {} templates in {}ms", LOG_PREFIX, instance, parts, duration_ms);
}

pub fn log_refresh_decision(instance: Uuid, view: CalendarView, should_update: bool) {
    log::debug!("{} [{}] refresh of {} view, render requested: {}",
                LOG_PREFIX, instance, view, should_update);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_level("error"), LevelFilter::Error);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn test_logger_installs_once() {
        let _ = init_logging();
        assert!(init_logging().is_err());
        log_error_with_context(
            &anyhow::anyhow!("calendarDayView.html returned 404").context("loading templates"),
            "Could not load all calendar templates",
        );
    }
}
