//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise `LOG_LEVEL` applies to this crate,
//! the `notifications` target and tower-http. With a log directory, output
//! goes to a daily rolling JSON file.

use tracing_subscriber::EnvFilter;

/// Default filter for a log level
pub fn default_filter(level: &str) -> String {
    format!("admin_server={level},notifications={level},tower_http={level}")
}

/// Initialize the global subscriber
///
/// Returns the appender guard when logging to files; it must be held for the
/// lifetime of the process so buffered lines are flushed.
pub fn init_logger(
    log_level: &str,
    log_dir: Option<&str>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(dir) = log_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Cannot create log directory {dir}: {e}, logging to stdout");
        } else {
            let file_appender = tracing_appender::rolling::daily(dir, "admin-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            subscriber.json().with_writer(writer).init();
            return Some(guard);
        }
    }

    subscriber.init();
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter("debug"),
            "admin_server=debug,notifications=debug,tower_http=debug"
        );
        assert!(EnvFilter::try_new(default_filter("info")).is_ok());
    }
}
