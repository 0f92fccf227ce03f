//! Configuration loading and types for typeout
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/typeout/config.toml)
//! 3. Environment variables (TYPEOUT_*)
//! 4. CLI arguments (highest priority)

use crate::error::TypeoutError;
use crate::security::SecurityPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool setting that lets the selector decide
pub const AUTO: &str = "auto";

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# typeout configuration
#
# Location: ~/.config/typeout/config.toml
# All settings can be overridden via CLI flags

[output]
# Where `typeout send` delivers text: "active_window" or "clipboard"
# - active_window: simulates keyboard input in the focused window
# - clipboard: copies text to the system clipboard
default_mode = "active_window"

# Clipboard tool: "auto", "wl-copy" or "xsel"
# auto picks wl-copy on Wayland and xsel everywhere else
clipboard_tool = "auto"

# Typing tool: "auto", "wtype", "ydotool" or "xdotool"
# auto on Wayland prefers wtype (ydotool first on GNOME), xdotool on X11
type_tool = "auto"

# Kill the tool if it runs longer than this many milliseconds (0 = never)
timeout_ms = 0

[security]
# Executables typeout may spawn. Anything not listed is refused.
# An empty list refuses everything.
allowed_commands = ["wl-copy", "xsel", "wtype", "ydotool", "xdotool"]
"#;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Text output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Delivery used by `typeout send`
    #[serde(default)]
    pub default_mode: OutputMode,

    /// "auto" or an explicit clipboard tool name
    #[serde(default = "default_auto")]
    pub clipboard_tool: String,

    /// "auto" or an explicit typing tool name
    #[serde(default = "default_auto")]
    pub type_tool: String,

    /// Per-invocation timeout in milliseconds, 0 disables it
    #[serde(default)]
    pub timeout_ms: u64,
}

/// Output mode selection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Simulate keyboard input in the focused window
    #[default]
    #[serde(alias = "type")]
    ActiveWindow,
    /// Copy to clipboard
    Clipboard,
}

impl std::str::FromStr for OutputMode {
    type Err = TypeoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clipboard" => Ok(OutputMode::Clipboard),
            "active_window" | "active-window" | "type" => Ok(OutputMode::ActiveWindow),
            other => Err(TypeoutError::Config(format!(
                "Unknown output mode '{}'. Use 'clipboard' or 'active_window'",
                other
            ))),
        }
    }
}

/// Allowlist configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Executable names that may be spawned; empty permits nothing
    #[serde(default)]
    pub allowed_commands: Vec<String>,
}

impl SecurityConfig {
    pub fn policy(&self) -> SecurityPolicy {
        SecurityPolicy::new(self.allowed_commands.iter().cloned())
    }
}

fn default_auto() -> String {
    AUTO.to_string()
}

/// True when a tool setting asks for automatic selection
pub fn is_auto(tool: &str) -> bool {
    let tool = tool.trim();
    tool.is_empty() || tool.eq_ignore_ascii_case(AUTO)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_mode: OutputMode::default(),
            clipboard_tool: default_auto(),
            type_tool: default_auto(),
            timeout_ms: 0,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "typeout")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply TYPEOUT_* environment overrides from a variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), TypeoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("TYPEOUT_MODE") {
            self.output.default_mode = mode.parse()?;
        }
        if let Some(tool) = lookup("TYPEOUT_CLIPBOARD_TOOL") {
            self.output.clipboard_tool = tool.trim().to_string();
        }
        if let Some(tool) = lookup("TYPEOUT_TYPE_TOOL") {
            self.output.type_tool = tool.trim().to_string();
        }
        if let Some(list) = lookup("TYPEOUT_ALLOWED_COMMANDS") {
            self.security.allowed_commands = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        Ok(())
    }
}

/// Load configuration from file, with defaults for missing values
pub fn load_config(path: Option<&Path>) -> Result<Config, TypeoutError> {
    // Start with defaults
    let mut config = Config::default();

    // Determine config file path
    let config_path = path.map(PathBuf::from).or_else(Config::default_path);

    // Load from file if it exists
    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| TypeoutError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| TypeoutError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    // Override from environment variables
    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    if config.security.allowed_commands.is_empty() {
        tracing::warn!(
            "No allowed_commands configured; every tool will be refused. Run 'typeout config --init'"
        );
    }

    Ok(config)
}

/// Write the default config template, refusing to overwrite an existing file
pub fn write_default_config(path: &Path) -> Result<(), TypeoutError> {
    if path.exists() {
        return Err(TypeoutError::Config(format!(
            "Config already exists at {:?}",
            path
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| TypeoutError::Config(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| TypeoutError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}
