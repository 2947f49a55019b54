// RUNTIME PREFERENCES (User Experience)

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to log a summary event when a scan completes
    pub log_scan_summary: bool,

    /// Whether to emit a warning when an integer literal wraps past u64
    pub warn_on_numeric_overflow: bool,

    /// Whether to attach line/column context to logged lexer errors
    pub include_position_in_errors: bool,

    /// Whether to log each BufferExhausted suspension
    pub log_suspensions: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            log_scan_summary: env::var(env_vars::LEXICAL_LOG_SUMMARY)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            warn_on_numeric_overflow: env::var(env_vars::LEXICAL_WARN_OVERFLOW)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_position_in_errors: env::var(env_vars::LEXICAL_INCLUDE_POSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_suspensions: env::var(env_vars::LEXICAL_LOG_SUSPENSIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML document. Missing tables and keys fall
    /// back to the environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid runtime configuration: {}", e))
    }

    /// Make the logging preferences process-wide and hand back the lexical
    /// ones for [`ScanContext::with_preferences`](crate::lexical::ScanContext::with_preferences).
    ///
    /// Fails once the logging preferences have been read or installed.
    pub fn install(self) -> Result<LexicalPreferences, String> {
        crate::logging::config::init_runtime_preferences(self.logging)?;
        Ok(self.lexical)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_LOG_SUMMARY: &str = "KH_LEXICAL_LOG_SUMMARY";
    pub const LEXICAL_WARN_OVERFLOW: &str = "KH_LEXICAL_WARN_OVERFLOW";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "KH_LEXICAL_INCLUDE_POSITIONS";
    pub const LEXICAL_LOG_SUSPENSIONS: &str = "KH_LEXICAL_LOG_SUSPENSIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "KH_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "KH_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "KH_LOGGING_MIN_LEVEL";
}
