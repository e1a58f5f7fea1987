use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::github::DEFAULT_API_URL;
use crate::pagination::NEAR_BOTTOM_THRESHOLD;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API, without a trailing slash
    pub api_url: String,
    /// Environment variable holding the token
    pub token_env: Option<String>,
    /// Command whose stdout is the token, tried after `token_env`
    pub token_command: Option<String>,
    /// Rows from the bottom of a repository pane that trigger the next page
    pub scroll_threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
            scroll_threshold: NEAR_BOTTOM_THRESHOLD,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("ghseek").join("config.toml"))
}

impl Config {
    /// Load the user config. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content).map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
api_url = "https://github.example.com/api/v3"
token_env = "GHE_TOKEN"
token_command = "pass show ghe"
scroll_threshold = 3
"#;
        let config = Config::parse(toml_str).unwrap();
        assert_eq!(config.api_url, "https://github.example.com/api/v3");
        assert_eq!(config.token_env.as_deref(), Some("GHE_TOKEN"));
        assert_eq!(config.token_command.as_deref(), Some("pass show ghe"));
        assert_eq!(config.scroll_threshold, 3);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = Config::parse("scroll_threshold = 4").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.token_env.as_deref(), Some("GITHUB_TOKEN"));
        assert_eq!(config.scroll_threshold, 4);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("ghseek-does-not-exist").join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn invalid_file_is_config_error() {
        let dir = std::env::temp_dir().join(format!("ghseek-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "scroll_threshold = \"lots\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
