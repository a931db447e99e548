//! Log level resolution shared by both binaries

use tracing::Level;

/// Parse a level name (TRACE, DEBUG, INFO, WARN/WARNING, ERROR), any case
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" | "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

/// Pick the level with priority: CLI flag > config file > INFO
///
/// Runs before logging exists, so an unknown name is reported on stderr.
pub fn resolve_level(cli_level: Option<&str>, config_level: Option<&str>) -> Level {
    match cli_level.or(config_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            Level::INFO
        }),
        None => Level::INFO,
    }
}
