//! Validation utilities for identifiers and configuration values

/// Validate a namespace, queue or consumer identifier
///
/// Identifiers become segments of store keys, so they must be non-empty and
/// must not contain the key separator.
pub fn validate_identifier(value: &str, separator: char) -> Result<(), String> {
    if value.is_empty() {
        return Err("Identifier cannot be empty".to_string());
    }

    if value.contains(separator) {
        return Err(format!(
            "'{}' contains the reserved key separator '{}'",
            value, separator
        ));
    }

    Ok(())
}

/// Validate a message time-to-live in seconds
pub fn validate_ttl_seconds(seconds: u64) -> Result<u64, String> {
    if seconds == 0 {
        Err("Message TTL must be at least 1 second".to_string())
    } else {
        Ok(seconds)
    }
}

/// Validate a log level name
pub fn validate_log_level(level: &str) -> Result<String, String> {
    let lowered = level.to_ascii_lowercase();
    match lowered.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(lowered),
        _ => Err(format!(
            "'{}' is not a valid log level (trace, debug, info, warn, error, off)",
            level
        )),
    }
}
