//! Configuration management for Quill.
//!
//! Parses `quill.toml` with serde and discovers it in the current directory
//! or its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `rendering.default_input`
//! - `rendering.default_output`
//! - `wiki.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the input syntax.
    pub default_input: Option<String>,
    /// Override the output syntax.
    pub default_output: Option<String>,
    /// Override whether macros run.
    pub macros_enabled: Option<bool>,
    /// Override the wiki base URL.
    pub wiki_base_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output syntaxes.
    pub rendering: RenderingConfig,
    /// Macro transformation.
    pub macros: MacrosConfig,
    /// XHTML parsing and rendering.
    pub xhtml: XhtmlConfig,
    /// Wiki model used to resolve links.
    pub wiki: WikiConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Syntaxes used when a command does not name them.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Input syntax id, e.g. `xhtml/1.0`.
    pub default_input: String,
    /// Output syntax id.
    pub default_output: String,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            default_input: "xhtml/1.0".to_owned(),
            default_output: "xhtml/1.0".to_owned(),
        }
    }
}

/// What to do with a failing macro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Put an error block in place of the macro and continue.
    #[default]
    Marker,
    /// Fail the whole render.
    Abort,
}

/// Macro transformation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MacrosConfig {
    /// Whether macros run at all.
    pub enabled: bool,
    /// Upper bound on macro executions per document.
    pub max_executions: usize,
    /// Failure handling.
    pub on_error: OnError,
}

impl Default for MacrosConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_executions: 1000,
            on_error: OnError::Marker,
        }
    }
}

/// XHTML configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct XhtmlConfig {
    /// CSS classes of elements left out when parsing.
    pub ignore_classes: Vec<String>,
    /// Write non-ASCII characters as numeric references.
    ///
    /// Default: true
    pub escape_non_ascii: bool,
}

impl Default for XhtmlConfig {
    fn default() -> Self {
        Self {
            ignore_classes: vec!["wikigeneratedlinkcontent".to_owned()],
            escape_non_ascii: true,
        }
    }
}

/// Wiki configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Base URL of document links.
    pub base_url: String,
    /// Documents known to exist; links to others render as "create" links.
    pub documents: Vec<String>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "/wiki".to_owned(),
            documents: Vec::new(),
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
        /// Config field path (e.g., "`wiki.base_url`").
        field: String,
        /// Error message (e.g., "${`QUILL_WIKI_URL`} not set").
        message: String,
    },
}

/// Require a syntax id of the form `type/version`.
fn require_syntax_id(value: &str, field: &str) -> Result<(), ConfigError> {
    match value.split_once('/') {
        Some((syntax_type, version)) if !syntax_type.is_empty() && !version.is_empty() => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{field} must have the form <type>/<version>, got \"{value}\""
        ))),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in the current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading and take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(input) = &settings.default_input {
            self.rendering.default_input.clone_from(input);
        }
        if let Some(output) = &settings.default_output {
            self.rendering.default_output.clone_from(output);
        }
        if let Some(enabled) = settings.macros_enabled {
            self.macros.enabled = enabled;
        }
        if let Some(base_url) = &settings.wiki_base_url {
            self.wiki.base_url.clone_from(base_url);
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_syntax_id(&self.rendering.default_input, "rendering.default_input")?;
        require_syntax_id(&self.rendering.default_output, "rendering.default_output")?;

        if self.macros.max_executions == 0 {
            return Err(ConfigError::Validation(
                "macros.max_executions must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.rendering.default_input =
            expand::expand_env(&self.rendering.default_input, "rendering.default_input")?;
        self.rendering.default_output =
            expand::expand_env(&self.rendering.default_output, "rendering.default_output")?;
        self.wiki.base_url = expand::expand_env(&self.wiki.base_url, "wiki.base_url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.rendering.default_input, "xhtml/1.0");
        assert_eq!(config.rendering.default_output, "xhtml/1.0");
        assert!(config.macros.enabled);
        assert_eq!(config.macros.max_executions, 1000);
        assert_eq!(config.macros.on_error, OnError::Marker);
        assert_eq!(config.xhtml.ignore_classes, vec!["wikigeneratedlinkcontent"]);
        assert!(config.xhtml.escape_non_ascii);
        assert_eq!(config.wiki.base_url, "/wiki");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.rendering.default_input, "xhtml/1.0");
        assert_eq!(config.macros.max_executions, 1000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[rendering]
default_input = "plain/1.0"
default_output = "xhtml/1.0"

[macros]
enabled = false
max_executions = 50
on_error = "abort"

[xhtml]
ignore_classes = ["comment", "hidden"]
escape_non_ascii = false

[wiki]
base_url = "https://wiki.example.com"
documents = ["Main.WebHome"]
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.rendering.default_input, "plain/1.0");
        assert!(!config.macros.enabled);
        assert_eq!(config.macros.max_executions, 50);
        assert_eq!(config.macros.on_error, OnError::Abort);
        assert_eq!(config.xhtml.ignore_classes, vec!["comment", "hidden"]);
        assert!(!config.xhtml.escape_non_ascii);
        assert_eq!(config.wiki.base_url, "https://wiki.example.com");
        assert_eq!(config.wiki.documents, vec!["Main.WebHome"]);
    }

    #[test]
    fn test_parse_unknown_on_error_fails() {
        let result: Result<Config, _> = toml::from_str("[macros]\non_error = \"ignore\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_syntax_id() {
        let mut config = Config::default();
        config.rendering.default_input = "xhtml".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rendering.default_input"));

        config.rendering.default_input = "/1.0".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_executions_zero() {
        let mut config = Config::default();
        config.macros.max_executions = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            default_input: Some("plain/1.0".to_owned()),
            default_output: None,
            macros_enabled: Some(false),
            wiki_base_url: Some("/docs".to_owned()),
        });

        assert_eq!(config.rendering.default_input, "plain/1.0");
        assert_eq!(config.rendering.default_output, "xhtml/1.0");
        assert!(!config.macros.enabled);
        assert_eq!(config.wiki.base_url, "/docs");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.rendering.default_input, "xhtml/1.0");
        assert!(config.macros.enabled);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[macros]\nmax_executions = 7\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.macros.max_executions, 7);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[macros\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_validates_after_cli_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            default_output: Some("bogus".to_owned()),
            ..CliSettings::default()
        };

        assert!(matches!(
            Config::load(Some(&path), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested).unwrap();

        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(nested.join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_expand_env_vars_wiki_base_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_TEST_WIKI_URL", "https://wiki.test");
        }
        let mut config: Config =
            toml::from_str("[wiki]\nbase_url = \"${QUILL_TEST_WIKI_URL}/bin\"\n").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.wiki.base_url, "https://wiki.test/bin");
        unsafe {
            std::env::remove_var("QUILL_TEST_WIKI_URL");
        }
    }

    #[test]
    fn test_expand_env_vars_default_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_TEST_WIKI_UNSET");
        }
        let mut config: Config =
            toml::from_str("[wiki]\nbase_url = \"${QUILL_TEST_WIKI_UNSET:-/wiki}\"\n").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.wiki.base_url, "/wiki");
    }
}
