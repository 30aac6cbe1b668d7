//! Configuration management for blogpost.
//!
//! Parses `blogpost.toml` configuration files with serde. The default
//! location is `~/.blogpost.toml`; an explicit path can be supplied with
//! `--conf-file`.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `wordpress.url`
//! - `wordpress.username`
//! - `wordpress.password`
//! - `asciidoc.command`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file location, tilde-expanded at load time.
const DEFAULT_CONF_FILE: &str = "~/.blogpost.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WordPress server configuration.
    pub wordpress: Option<WordpressConfig>,
    /// AsciiDoc converter configuration.
    pub asciidoc: AsciidocConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// WordPress server configuration.
#[derive(Debug, Deserialize)]
pub struct WordpressConfig {
    /// XML-RPC endpoint URL (usually ends in `/xmlrpc.php`).
    pub url: String,
    /// WordPress login name.
    pub username: String,
    /// WordPress password.
    pub password: String,
    /// Blog id passed on each call (multi-blog installations).
    #[serde(default = "default_blog_id")]
    pub blog_id: String,
}

impl WordpressConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "wordpress.url")?;
        require_http_url(&self.url, "wordpress.url")?;
        require_non_empty(&self.username, "wordpress.username")?;
        require_non_empty(&self.password, "wordpress.password")?;
        require_non_empty(&self.blog_id, "wordpress.blog_id")?;
        Ok(())
    }
}

fn default_blog_id() -> String {
    "0".to_owned()
}

/// AsciiDoc converter configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AsciidocConfig {
    /// Converter command name or path.
    pub command: String,
    /// HTML backend passed to the converter.
    pub backend: String,
}

impl Default for AsciidocConfig {
    fn default() -> Self {
        Self {
            command: "asciidoc".to_owned(),
            backend: "html4".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`wordpress.password`").
        field: String,
        /// Error message (e.g., "${`BLOGPOST_PASSWORD`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file and fails if it
    /// does not exist. Otherwise loads `~/.blogpost.toml` when present, or
    /// falls back to built-in defaults (no `[wordpress]` section).
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let default_path = PathBuf::from(shellexpand::tilde(DEFAULT_CONF_FILE).into_owned());
        if default_path.exists() {
            Self::load_from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get validated WordPress configuration.
    ///
    /// Returns the WordPress config if the `[wordpress]` section is present
    /// and all fields are valid. Use this instead of accessing the
    /// `wordpress` field directly when the command requires the server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_wordpress(&self) -> Result<&WordpressConfig, ConfigError> {
        let wordpress = self.wordpress.as_ref().ok_or_else(|| {
            ConfigError::Validation("[wordpress] section required in config".into())
        })?;
        wordpress.validate()?;
        Ok(wordpress)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut wordpress) = self.wordpress {
            wordpress.url = expand::expand_env(&wordpress.url, "wordpress.url")?;
            wordpress.username = expand::expand_env(&wordpress.username, "wordpress.username")?;
            wordpress.password = expand::expand_env(&wordpress.password, "wordpress.password")?;
        }
        self.asciidoc.command = expand::expand_env(&self.asciidoc.command, "asciidoc.command")?;
        Ok(())
    }
}
