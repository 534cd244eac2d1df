// src/logging.rs

use crate::models::ApiCallLog;
use env_logger::Env;

/// Installs the global logger. `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let env = Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

/// Records one call to the language model API.
pub fn log_api_call(log: &ApiCallLog) {
    log::info!(
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    );
}
