//! Tracing setup for the terminal client.
//!
//! # Configuration
//!
//! - `RUST_LOG`: Full filter directive; takes precedence over `LOG_LEVEL`
//! - `LOG_LEVEL`: Level for the edulink crates (default: `info`)
//! - `LOG_FORMAT`: `json` for JSON lines, anything else for compact text
//! - `LOG_DIR`: When set, logs go to `LOG_DIR/edulink.log` instead of stderr

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "edulink.log";
const EDULINK_TARGETS: [&str; 6] = [
    "edulink",
    "edulink_core",
    "edulink_config",
    "edulink_models",
    "edulink_storage",
    "edulink_gateway",
];

fn default_directives(level: &str) -> String {
    let mut directives: Vec<String> = EDULINK_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("reqwest=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = env::var("LOG_LEVEL")
            .ok()
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "info".to_string());
        EnvFilter::new(default_directives(&level))
    })
}

fn log_writer() -> (BoxMakeWriter, Option<WorkerGuard>) {
    let Some(dir) = env::var("LOG_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
    else {
        return (BoxMakeWriter::new(io::stderr), None);
    };

    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!(
            "⚠️  Failed to create log directory {}: {}. Logging to stderr...",
            dir.display(),
            e
        );
        return (BoxMakeWriter::new(io::stderr), None);
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    (BoxMakeWriter::new(writer), Some(guard))
}

/// Installs the global subscriber. Keep the returned guard alive until exit so buffered file
/// output is flushed.
pub fn init_tracing() -> Option<WorkerGuard> {
    let filter = build_filter();
    let (writer, guard) = log_writer();
    let to_file = guard.is_some();
    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let layer = if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(!to_file)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_filter(filter)
            .boxed()
    };

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        eprintln!("⚠️  A tracing subscriber is already installed");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("edulink=debug,edulink_core=debug"));
        assert!(directives.contains("edulink_gateway=debug"));
        assert!(directives.ends_with("reqwest=warn,hyper=warn"));
    }

    #[test]
    fn test_default_directives_parse() {
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }
}
