//! Configuration file handling

use serde::Deserialize;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Command interpreter settings
    #[serde(default)]
    pub shell: ShellConfig,

    /// Console output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Interpreter used to run fixture and step scripts
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Interpreter executable
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the script, e.g. `-c`
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

#[cfg(not(windows))]
fn default_program() -> String {
    "sh".to_string()
}

#[cfg(windows)]
fn default_program() -> String {
    "cmd".to_string()
}

#[cfg(not(windows))]
fn default_args() -> Vec<String> {
    vec!["-c".to_string()]
}

#[cfg(windows)]
fn default_args() -> Vec<String> {
    vec!["/C".to_string()]
}

/// Console output configuration
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Decorate PASS/FAILED with ANSI colors
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return Self::from_toml_str(&content);
            }
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
