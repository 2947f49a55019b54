// build.rs - TOML-driven constant generation for the lexer
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexer: LexerSettings,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexerSettings {
    /// Column width of a tab character. Mandatory when line/column
    /// tracking is compiled in, ignored otherwise.
    tab_width: Option<u32>,
    initial_record_capacity: usize,
    growth_factor: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KH_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=KH_CONFIG_DIR");

    let profile = env::var("KH_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("KH_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let track_line_column = env::var_os("CARGO_FEATURE_TRACK_LINE_COLUMN").is_some();

    // Find workspace root (parent of kh_lexer directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    let tab_width = validate_constraints(&config, &profile, track_line_column);
    generate_constants(&config, &profile, tab_width);
}

/// Returns the tab width to emit, if tracking is compiled in.
fn validate_constraints(
    config: &CompileTimeConfig,
    profile: &str,
    track_line_column: bool,
) -> Option<u32> {
    const MAX_TAB_WIDTH: u32 = 16;
    const ABSOLUTE_MAX_INITIAL_RECORDS: usize = 1 << 24;

    if config.lexer.initial_record_capacity == 0 {
        panic!("LEXER: initial_record_capacity must be at least 1");
    }

    if config.lexer.initial_record_capacity > ABSOLUTE_MAX_INITIAL_RECORDS {
        panic!("LEXER: initial_record_capacity exceeds absolute maximum");
    }

    if config.lexer.growth_factor < 2 {
        panic!("LEXER: growth_factor must be at least 2 so resumption makes progress");
    }

    if config.logging.log_buffer_size == 0 {
        panic!("LOGGING: log_buffer_size must be at least 1");
    }

    if config.logging.max_log_message_length < 16 {
        panic!("LOGGING: max_log_message_length too small (min: 16)");
    }

    if profile == "production" && config.logging.log_buffer_size > 10_000 {
        panic!("PRODUCTION: log_buffer_size too high for production");
    }

    if !track_line_column {
        return None;
    }

    match config.lexer.tab_width {
        Some(width) if (1..=MAX_TAB_WIDTH).contains(&width) => Some(width),
        Some(width) => panic!(
            "LEXER: tab_width {} out of range (1..={})",
            width, MAX_TAB_WIDTH
        ),
        None => panic!(
            "LEXER: feature `track-line-column` is enabled but `lexer.tab_width` is not set in {}.toml",
            profile
        ),
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str, tab_width: Option<u32>) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let tab_width_item = match tab_width {
        Some(width) => format!("pub const TAB_WIDTH: u32 = {};", width),
        None => String::new(),
    };

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexer {{
        pub const INITIAL_RECORD_CAPACITY: usize = {};
        pub const GROWTH_FACTOR: usize = {};
        {}
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.lexer.initial_record_capacity,
        config.lexer.growth_factor,
        tab_width_item,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
