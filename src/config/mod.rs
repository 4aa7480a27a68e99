// Configuration loaded from a redis.conf style file

mod static_config;

pub use static_config::StaticConfig;

/// Map a Redis `loglevel` to a tracing filter directive
pub fn log_filter(loglevel: &str) -> &'static str {
    match loglevel.to_ascii_lowercase().as_str() {
        "debug" | "verbose" => "debug",
        "warning" => "warn",
        "nothing" => "off",
        _ => "info",
    }
}
