//! Parser configuration from specparse.toml

use crate::preprocess::{CommandPreprocessor, Preprocessor, RawPreprocessor};
use crate::spec_model::UnknownFieldPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up next to the input when no config is given
pub const CONFIG_FILE_NAME: &str = "specparse.toml";

/// Main configuration from specparse.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// How spec files are turned into lines
    pub preprocessor: PreprocessorConfig,

    /// Field extraction settings
    pub parser: ExtractionConfig,
}

/// External macro expansion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Expand macros with `program`; read files raw when false
    pub enabled: bool,

    /// Macro expander executable
    pub program: String,

    /// Arguments passed before the spec file path
    pub args: Vec<String>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "rpmspec".to_string(),
            args: vec!["-P".to_string()],
        }
    }
}

/// Field extraction settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Policy for header keys that are not package fields
    pub unknown_fields: UnknownFieldPolicy,
}

impl ParserConfig {
    /// Load configuration from a specparse.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ParserConfig)` - Successfully loaded configuration; missing keys take defaults
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;

        let config: ParserConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        Ok(config)
    }

    /// Load `dir/specparse.toml` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("using configuration {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the preprocessor this configuration describes
    pub fn preprocessor(&self) -> Box<dyn Preprocessor> {
        if self.preprocessor.enabled {
            Box::new(CommandPreprocessor::new(
                self.preprocessor.program.clone(),
                self.preprocessor.args.clone(),
            ))
        } else {
            Box::new(RawPreprocessor)
        }
    }
}

/// Errors that can occur when loading the configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading the file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config: ParserConfig = toml::from_str(
            r#"
[preprocessor]
enabled = false
program = "/usr/bin/rpmspec"
args = ["-P", "--define", "dist .el9"]

[parser]
unknown_fields = "skip"
"#,
        )
        .unwrap();

        assert!(!config.preprocessor.enabled);
        assert_eq!(config.preprocessor.program, "/usr/bin/rpmspec");
        assert_eq!(config.preprocessor.args.len(), 3);
        assert_eq!(config.parser.unknown_fields, UnknownFieldPolicy::Skip);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: ParserConfig = toml::from_str("[preprocessor]\nenabled = false\n").unwrap();
        assert_eq!(config.preprocessor.program, "rpmspec");
        assert_eq!(config.preprocessor.args, vec!["-P"]);
        assert_eq!(config.parser.unknown_fields, UnknownFieldPolicy::Reject);

        let empty: ParserConfig = toml::from_str("").unwrap();
        assert_eq!(empty, ParserConfig::default());
    }

    #[test]
    fn test_invalid_policy_is_an_error() {
        let result: Result<ParserConfig, _> = toml::from_str("[parser]\nunknown_fields = \"maybe\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ParserConfig::discover(dir.path()).unwrap(), ParserConfig::default());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[parser]\nunknown_fields = \"skip\"\n",
        )
        .unwrap();
        let config = ParserConfig::discover(dir.path()).unwrap();
        assert_eq!(config.parser.unknown_fields, UnknownFieldPolicy::Skip);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ParserConfig::load("/nonexistent/specparse.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
