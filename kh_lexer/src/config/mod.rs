//! Configuration module for the lexer
//! Automatically uses generated constants from TOML configuration

// Include generated constants from build.rs
// This file is generated at compile time from your TOML configuration
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("KH_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("KH_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }

    /// Whether token records carry line/column positions in this build
    pub const fn tracks_line_column() -> bool {
        cfg!(feature = "track-line-column")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_lexer_constants() {
        assert!(compile_time::lexer::INITIAL_RECORD_CAPACITY >= 1);
        assert!(compile_time::lexer::GROWTH_FACTOR >= 2);
    }

    #[cfg(feature = "track-line-column")]
    #[test]
    fn test_tab_width_present_when_tracking() {
        assert!(compile_time::lexer::TAB_WIDTH >= 1);
        assert!(build_info::tracks_line_column());
    }

    #[test]
    fn test_source_info_names_profile() {
        assert!(build_info::source_info().ends_with(".toml"));
    }
}
