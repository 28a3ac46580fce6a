use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, LevelFilter};
use serde::Deserialize;
use vira_core::preprocessor::DEFAULT_MAX_INCLUDE_DEPTH;
use crate::error::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "vira.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub logger: LoggerConfig,
    pub preprocessor: PreprocessorConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub console_level: String,
    pub file_level: String,
    pub directory: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            console_level: "warn".to_string(),
            file_level: "debug".to_string(),
            directory: None,
        }
    }
}

impl LoggerConfig {
    pub fn console_filter(&self) -> Result<LevelFilter, String> {
        vira_logger::parse_level(&self.console_level)
            .ok_or_else(|| format!("unknown console_level '{}'", self.console_level))
    }

    pub fn file_filter(&self) -> Result<LevelFilter, String> {
        vira_logger::parse_level(&self.file_level)
            .ok_or_else(|| format!("unknown file_level '{}'", self.file_level))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessorConfig {
    pub include_paths: Vec<PathBuf>,
    pub max_include_depth: usize,
    pub defines: HashMap<String, String>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        PreprocessorConfig {
            include_paths: vec![PathBuf::from("/usr/lib/vira-lang/include"), PathBuf::from(".")],
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            defines: HashMap::new(),
        }
    }
}

pub fn parse_config(content: &str, origin: &Path) -> Result<Config, CliError> {
    let config: Config = toml::de::from_str(content)
        .map_err(|e| CliError::Config(origin.to_path_buf(), e.to_string()))?;

    config.logger.console_filter().map_err(|e| CliError::Config(origin.to_path_buf(), e))?;
    config.logger.file_filter().map_err(|e| CliError::Config(origin.to_path_buf(), e))?;

    Ok(config)
}

/// Loads `path` when given, otherwise `vira.toml` from the working directory
/// if it exists, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Config::default());
        }
        Err(e) => return Err(CliError::Config(path, e.to_string())),
    };

    parse_config(&content, &path)
}
