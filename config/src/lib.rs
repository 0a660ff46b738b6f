//! Configuration for the LazyScript compiler and formatter integration.
//!
//! ```toml
//! lazyscript_path = "lazyscript"
//! lazyscript_args = []
//! formatter_path = "lazyscript_format"
//! formatter_args = []
//! tool_timeout_secs = 30
//!
//! [diagnostics]
//! debounce_ms = 300
//! ```
//!
//! Lookup order: an explicit path, then `<workspace>/.lazyscript.toml`, then
//! `~/.lazyscript/config.toml`. No file at all means defaults.

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_COMPILER: &str = "lazyscript";
pub const DEFAULT_FORMATTER: &str = "lazyscript_format";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// File name looked up in each workspace folder.
pub const WORKSPACE_CONFIG_FILE: &str = ".lazyscript.toml";

fn default_compiler() -> String {
    DEFAULT_COMPILER.to_string()
}

fn default_formatter() -> String {
    DEFAULT_FORMATTER.to_string()
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_tool_timeout_secs() -> u64 {
    DEFAULT_TOOL_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LazyscriptConfig {
    /// Compiler executable: bare name or path. `${VAR}` is expanded.
    #[serde(default = "default_compiler")]
    pub lazyscript_path: String,
    /// Extra arguments placed before the file argument.
    #[serde(default)]
    pub lazyscript_args: Vec<String>,
    #[serde(default = "default_formatter")]
    pub formatter_path: String,
    #[serde(default)]
    pub formatter_args: Vec<String>,
    /// Upper bound on a single tool run.
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagnosticsConfig {
    /// Quiet period after the last edit before the compiler runs.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Default for LazyscriptConfig {
    fn default() -> Self {
        Self {
            lazyscript_path: default_compiler(),
            lazyscript_args: Vec::new(),
            formatter_path: default_formatter(),
            formatter_args: Vec::new(),
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl LazyscriptConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.diagnostics.debounce_ms)
    }

    #[must_use]
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Parse and env-expand a config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Ok(config.expanded())
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Load the first config file found for `workspace`, or defaults.
    pub fn discover(workspace: Option<&Path>) -> Result<Self, ConfigError> {
        for candidate in config_candidates(workspace) {
            if candidate.is_file() {
                return Self::load_from(&candidate);
            }
        }
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn expanded(mut self) -> Self {
        self.lazyscript_path = expand_env_vars(&self.lazyscript_path);
        self.formatter_path = expand_env_vars(&self.formatter_path);
        for arg in self
            .lazyscript_args
            .iter_mut()
            .chain(self.formatter_args.iter_mut())
        {
            *arg = expand_env_vars(arg);
        }
        self
    }
}

fn config_candidates(workspace: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(workspace) = workspace {
        candidates.push(workspace.join(WORKSPACE_CONFIG_FILE));
    }
    if let Some(path) = config_path() {
        candidates.push(path);
    }
    candidates
}

/// `~/.lazyscript/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".lazyscript").join("config.toml"))
}

/// Replace `${VAR}` with the variable's value. Unset variables expand to
/// nothing; an unclosed `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}
