//! Configuration for the dispatch table generator
//!
//! A single TOML file describes where artifacts go, how the perfect hash is
//! searched, how to log, and the ordered method table itself.

use crate::core::error::{Error, Result};
use crate::keyset::RESERVED_METHODS;
use crate::mph::MAX_BUCKET_FACTOR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file looked up by [`Config::load`]
pub const DEFAULT_CONFIG_FILE: &str = "rpc-table.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Perfect hash search configuration
    #[serde(default)]
    pub hash: HashConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// User methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodEntry>,

    /// Reserved system methods, always injected ahead of user methods.
    /// Never read from or written to the config file.
    #[serde(skip, default = "default_reserved")]
    pub reserved: Vec<String>,
}

/// One `[[methods]]` entry as written by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
    /// Method name as sent on the wire
    pub name: String,

    /// Ordered parameter type tags, e.g. `["TEXT_STRING"]`
    #[serde(default)]
    pub params: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving generated files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Generated C source file name
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Generated C header file name
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Also write the dispatch table as JSON
    #[serde(default)]
    pub emit_descriptor: bool,

    /// JSON descriptor file name
    #[serde(default = "default_descriptor_name")]
    pub descriptor_name: String,

    /// Build and verify only; write nothing
    #[serde(default)]
    pub dry_run: bool,
}

/// Perfect hash search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashConfig {
    /// Pinned salt seed for byte-reproducible output
    #[serde(default)]
    pub seed: Option<u64>,

    /// Buckets per key (1.0 to 16.0)
    #[serde(default = "default_bucket_factor")]
    pub bucket_factor: f64,

    /// Salt pairs tried after the first before giving up
    #[serde(default = "default_max_restarts")]
    pub max_restarts: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (full, compact, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            hash: HashConfig::default(),
            logging: LoggingConfig::default(),
            methods: Vec::new(),
            reserved: default_reserved(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            source_name: default_source_name(),
            header_name: default_header_name(),
            emit_descriptor: false,
            descriptor_name: default_descriptor_name(),
            dry_run: false,
        }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            seed: None,
            bucket_factor: default_bucket_factor(),
            max_restarts: default_max_restarts(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions for serde
fn default_reserved() -> Vec<String> { RESERVED_METHODS.iter().map(|s| s.to_string()).collect() }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_source_name() -> String { "rpc_api.c".to_string() }
fn default_header_name() -> String { "rpc_api.h".to_string() }
fn default_descriptor_name() -> String { "rpc_api.json".to_string() }
fn default_bucket_factor() -> f64 { 1.0 }
fn default_max_restarts() -> usize { 1_000 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Config {
    /// Load configuration from the default file (if present) and environment variables
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            config = Self::from_file(DEFAULT_CONFIG_FILE)?;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply `RPCGEN_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(seed) = env::var("RPCGEN_SEED") {
            self.hash.seed = Some(seed.parse()
                .map_err(|e| Error::config(format!("Invalid seed: {}", e)))?);
        }

        if let Ok(dir) = env::var("RPCGEN_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }

        if let Ok(level) = env::var("RPCGEN_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let factor = self.hash.bucket_factor;
        if !(1.0..=MAX_BUCKET_FACTOR).contains(&factor) {
            return Err(Error::config(format!(
                "bucket_factor must be within 1.0..={}, got {}",
                MAX_BUCKET_FACTOR, factor
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(Error::config(format!("Invalid log level: {}", other))),
        }

        match self.logging.format.as_str() {
            "full" | "compact" | "pretty" => {}
            other => return Err(Error::config(format!("Invalid log format: {}", other))),
        }

        let names = [
            &self.output.source_name,
            &self.output.header_name,
            &self.output.descriptor_name,
        ];
        if names.iter().any(|n| n.is_empty()) {
            return Err(Error::config("Output file names must not be empty"));
        }
        if self.output.source_name == self.output.header_name {
            return Err(Error::config("Source and header file names must differ"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_table_in_order() {
        let config = Config::from_toml_str(
            r#"
            [hash]
            seed = 42

            [[methods]]
            name = "echo"
            params = ["TEXT_STRING"]

            [[methods]]
            name = "always_error"

            [[methods]]
            name = "sum_array"
            params = ["CBOR_TYPE_ARRAY"]
            "#,
        )
        .unwrap();

        let names: Vec<&str> = config.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["echo", "always_error", "sum_array"]);
        assert_eq!(config.methods[1].params, Vec::<String>::new());
        assert_eq!(config.hash.seed, Some(42));
        assert_eq!(config.hash.max_restarts, 1_000);
        assert_eq!(config.output.source_name, "rpc_api.c");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reserved_methods_are_not_configurable() {
        let config = Config::from_toml_str(r#"reserved = ["not_a_system_method"]"#).unwrap();
        assert_eq!(config.reserved, vec!["__funcs", "__ping", "__version"]);
    }

    #[test]
    fn test_rejects_small_bucket_factor() {
        let mut config = Config::default();
        config.hash.bucket_factor = 0.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_huge_bucket_factor() {
        let mut config = Config::default();
        config.hash.bucket_factor = 1e30;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.hash.bucket_factor = f64::NAN;
        assert!(config.validate().is_err());
        config.hash.bucket_factor = MAX_BUCKET_FACTOR;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("RPCGEN_SEED", "1234");
        std::env::set_var("RPCGEN_OUTPUT_DIR", "gen/out");
        let mut config = Config::default();
        let applied = config.apply_env_overrides();

        std::env::set_var("RPCGEN_SEED", "not-a-number");
        let mut bad = Config::default();
        let rejected = bad.apply_env_overrides();

        std::env::remove_var("RPCGEN_SEED");
        std::env::remove_var("RPCGEN_OUTPUT_DIR");

        assert!(applied.is_ok());
        assert_eq!(config.hash.seed, Some(1234));
        assert_eq!(config.output.dir, PathBuf::from("gen/out"));
        assert!(matches!(rejected, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml_str("[[methods]]\nname = 7").unwrap_err();
        assert!(err.is_input_error());
    }
}
