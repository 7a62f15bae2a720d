//! `mark.toml` loading.
//!
//! The file is looked up in the working directory and its parents unless a
//! path is given. Command-line flags are layered on top through
//! [`CliSettings`].
//!
//! ```toml
//! [confluence]
//! base_url = "https://wiki.example.com"
//! username = "${MARK_USERNAME}"
//! password = "${MARK_PASSWORD:-}"
//!
//! [render]
//! drop_h1 = true
//! ```
//!
//! The three `[confluence]` values accept `${VAR}` (must be set) and
//! `${VAR:-default}` references.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line overrides. `None` keeps the file's value.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override Confluence username.
    pub username: Option<String>,
    /// Override Confluence password or API token.
    pub password: Option<String>,
    /// Override leading H1 stripping.
    pub drop_h1: Option<bool>,
}

/// File name looked up during discovery.
const CONFIG_FILENAME: &str = "mark.toml";

/// Contents of `mark.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[confluence]` section.
    pub confluence: Option<ConfluenceConfig>,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Where the configuration was loaded from, if a file was found.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Drop the document's leading H1 so it doesn't duplicate the page title.
    pub drop_h1: bool,
}

/// `[confluence]` section.
#[derive(Debug, Default, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence server base URL, including any context path.
    pub base_url: String,
    /// Username for basic authentication.
    #[serde(default)]
    pub username: String,
    /// Password or API token for basic authentication.
    #[serde(default)]
    pub password: String,
}

impl ConfluenceConfig {
    /// Check that every field is set and the URL is http(s).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.username, "confluence.username")?;
        require_non_empty(&self.password, "confluence.password")?;
        Ok(())
    }
}

/// Error loading `mark.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly given file does not exist.
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// `${VAR}` reference to an unset variable.
    #[error("cannot expand {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.password`").
        field: String,
        /// Error message (e.g., "${`MARK_PASSWORD`} not set").
        message: String,
    },
}

/// Reject an empty field.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Reject a URL that is not http(s).
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load `config_path`, or the discovered `mark.toml`, or defaults when
    /// there is neither, then apply `cli_settings` on top.
    ///
    /// # Errors
    ///
    /// Fails when `config_path` is missing, the file can't be read or parsed,
    /// or an environment reference can't be expanded.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Layer command-line overrides on top of the file.
    ///
    /// Any Confluence override creates the `[confluence]` section if the
    /// file didn't have one.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let overrides_confluence = settings.base_url.is_some()
            || settings.username.is_some()
            || settings.password.is_some();
        if overrides_confluence {
            let confluence = self.confluence.get_or_insert_with(ConfluenceConfig::default);
            if let Some(base_url) = &settings.base_url {
                confluence.base_url = base_url.trim_end_matches('/').to_owned();
            }
            if let Some(username) = &settings.username {
                confluence.username.clone_from(username);
            }
            if let Some(password) = &settings.password {
                confluence.password.clone_from(password);
            }
        }
        if let Some(drop_h1) = settings.drop_h1 {
            self.render.drop_h1 = drop_h1;
        }
    }

    /// The `[confluence]` section, validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the section is absent or
    /// incomplete.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("missing [confluence] section (or --base-url, --username, --password)".into())
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Walk up from the working directory looking for `mark.toml`.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Parse one file, expand references and normalize.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.normalize();
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Resolve `${VAR}` references in the `[confluence]` values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.username = expand::expand_env(&confluence.username, "confluence.username")?;
            confluence.password = expand::expand_env(&confluence.password, "confluence.password")?;
        }
        Ok(())
    }

    /// Trim trailing slashes so URLs can be composed with `/`-prefixed paths.
    fn normalize(&mut self) {
        if let Some(ref mut confluence) = self.confluence {
            let trimmed = confluence.base_url.trim_end_matches('/');
            if trimmed.len() != confluence.base_url.len() {
                confluence.base_url = trimmed.to_owned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_confluence() -> ConfluenceConfig {
        ConfluenceConfig {
            base_url: "https://wiki.example.com".to_owned(),
            username: "alice".to_owned(),
            password: "secret".to_owned(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.confluence.is_none());
        assert!(!config.render.drop_h1);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.confluence.is_none());
        assert!(!config.render.drop_h1);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[confluence]
base_url = "https://wiki.example.com/confluence"
username = "alice"
password = "secret"

[render]
drop_h1 = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let confluence = config.confluence.unwrap();
        assert_eq!(confluence.base_url, "https://wiki.example.com/confluence");
        assert_eq!(confluence.username, "alice");
        assert_eq!(confluence.password, "secret");
        assert!(config.render.drop_h1);
    }

    #[test]
    fn test_load_from_file_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.toml");
        std::fs::write(
            &path,
            "[confluence]\nbase_url = \"https://wiki.example.com/\"\nusername = \"a\"\npassword = \"b\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.confluence.as_ref().unwrap().base_url,
            "https://wiki.example.com"
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/mark.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.toml");
        std::fs::write(&path, "[confluence\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_creates_confluence_section() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            base_url: Some("https://wiki.example.com/".to_owned()),
            username: Some("alice".to_owned()),
            password: Some("secret".to_owned()),
            drop_h1: None,
        });

        let confluence = config.require_confluence().unwrap();
        assert_eq!(confluence.base_url, "https://wiki.example.com");
        assert_eq!(confluence.username, "alice");
    }

    #[test]
    fn test_apply_cli_settings_overrides_file_values() {
        let mut config = Config {
            confluence: Some(valid_confluence()),
            ..Default::default()
        };
        config.apply_cli_settings(&CliSettings {
            password: Some("override".to_owned()),
            drop_h1: Some(true),
            ..Default::default()
        });

        let confluence = config.confluence.as_ref().unwrap();
        assert_eq!(confluence.username, "alice");
        assert_eq!(confluence.password, "override");
        assert!(config.render.drop_h1);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.confluence.is_none());
        assert!(!config.render.drop_h1);
    }

    #[test]
    fn test_expand_env_vars_confluence() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MARK_TEST_URL", "https://confluence.test.com");
            std::env::set_var("MARK_TEST_PASSWORD", "token-123");
        }

        let toml = r#"
[confluence]
base_url = "${MARK_TEST_URL}"
username = "${MARK_TEST_USERNAME:-robot}"
password = "${MARK_TEST_PASSWORD}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        let confluence = config.confluence.unwrap();
        assert_eq!(confluence.base_url, "https://confluence.test.com");
        assert_eq!(confluence.username, "robot");
        assert_eq!(confluence.password, "token-123");

        unsafe {
            std::env::remove_var("MARK_TEST_URL");
            std::env::remove_var("MARK_TEST_PASSWORD");
        }
    }

    #[test]
    fn test_require_confluence_missing_section() {
        let config = Config::default();
        let err = config.require_confluence().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("[confluence]"));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let conf = ConfluenceConfig {
            base_url: "wiki.example.com".to_owned(),
            ..valid_confluence()
        };
        let err = conf.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_validate_empty_password() {
        let conf = ConfluenceConfig {
            password: String::new(),
            ..valid_confluence()
        };
        let err = conf.validate().unwrap_err();
        assert!(err.to_string().contains("confluence.password"));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(valid_confluence().validate().is_ok());
    }
}
