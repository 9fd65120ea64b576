//! Effective settings for one invocation
//!
//! Values come from three layers, highest precedence first:
//! - command-line flags
//! - `ripple.toml` in the module root
//! - built-in defaults

use crate::cli::{parse_duration, CliArgs};
use crate::engine::{EngineSettings, DEFAULT_SOURCE_SUFFIXES};
use crate::error::ConfigError;
use crate::impact::PropagationMode;
use crate::output::{OutputConfig, OutputFormat, DEFAULT_APPS_DIR};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project configuration file name, looked up in the module root
pub const CONFIG_FILENAME: &str = "ripple.toml";

/// Baseline revision used when neither flag nor file names one
pub const DEFAULT_BASE: &str = "origin/main";

/// Contents of `ripple.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base: Option<String>,
    pub output: Option<String>,
    pub apps_dir: Option<String>,
    pub source_suffixes: Option<Vec<String>>,
    pub match_module_prefix: Option<bool>,
    pub timeout: Option<String>,
}

impl FileConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load `ripple.toml` from `dir`, or defaults when the file is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading project configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Canonical module root
    pub project_dir: PathBuf,
    pub base: String,
    pub output: OutputFormat,
    pub apps_dir: String,
    pub source_suffixes: Vec<String>,
    pub propagation: PropagationMode,
    pub timeout: Option<Duration>,
    pub no_color: bool,
    pub quiet: bool,
}

impl Settings {
    /// Merge CLI arguments with the project's `ripple.toml`
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let project_dir =
            std::fs::canonicalize(&args.path).map_err(|e| ConfigError::InvalidPath {
                path: args.path.clone(),
                message: e.to_string(),
            })?;
        if !project_dir.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: args.path.clone(),
                message: "not a directory".to_string(),
            });
        }

        let file = FileConfig::load_from_dir(&project_dir)?;
        Self::merge(project_dir, args, file)
    }

    fn merge(project_dir: PathBuf, args: &CliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let output = match (args.output, file.output) {
            (Some(format), _) => format,
            (None, Some(name)) => parse_output_format(&name)?,
            (None, None) => OutputFormat::default(),
        };

        let timeout = match (args.timeout, file.timeout) {
            (Some(timeout), _) => Some(timeout),
            (None, Some(value)) => Some(parse_duration(&value)?),
            (None, None) => None,
        };

        let propagation = if args.match_module_prefix || file.match_module_prefix == Some(true) {
            PropagationMode::ModulePrefix
        } else {
            PropagationMode::Exact
        };

        let source_suffixes = file.source_suffixes.unwrap_or_else(|| {
            DEFAULT_SOURCE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        Ok(Self {
            project_dir,
            base: args
                .base
                .clone()
                .or(file.base)
                .unwrap_or_else(|| DEFAULT_BASE.to_string()),
            output,
            apps_dir: file
                .apps_dir
                .unwrap_or_else(|| DEFAULT_APPS_DIR.to_string()),
            source_suffixes,
            propagation,
            timeout,
            no_color: args.no_color,
            quiet: args.quiet,
        })
    }

    /// Settings for the impact engine
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            project_dir: self.project_dir.clone(),
            source_suffixes: self.source_suffixes.clone(),
            propagation: self.propagation,
            timeout: self.timeout,
        }
    }

    /// Settings for the report formatter; `color` is decided by the caller
    /// from the terminal state
    pub fn output_config(&self, color: bool) -> OutputConfig {
        OutputConfig::new(self.output, color && !self.no_color, self.apps_dir.clone())
    }
}

fn parse_output_format(name: &str) -> Result<OutputFormat, ConfigError> {
    <OutputFormat as clap::ValueEnum>::from_str(name, true).map_err(|_| {
        ConfigError::InvalidOutputFormat {
            value: name.to_string(),
        }
    })
}
