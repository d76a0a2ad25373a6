//! Configuration loader and validator for the case registry service.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the YouTube Data API key.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub database: Database,
    pub youtube: YouTube,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Upper bound for JSON request bodies (bulk imports can be large).
    pub json_limit_bytes: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            json_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Database {
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/cases.db".into(),
        }
    }
}

/// YouTube Data API settings. A missing `api_key` puts the video checks into
/// degraded mode; it is not a startup error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct YouTube {
    pub api_key: Option<String>,
    pub api_base: String,
    /// Channel used by the batch check when the request names none.
    pub channel_id: String,
}

impl Default for YouTube {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://www.googleapis.com/".into(),
            channel_id: "UCwTShuBukB8DsgvSSu_hpWg".into(),
        }
    }
}

impl YouTube {
    /// The configured key, treating blank strings as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Config {
    /// Apply `YOUTUBE_API_KEY` on top of whatever the file said.
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.youtube.api_key = Some(key);
        }
    }
}

/// Load configuration from a YAML file, overlay the environment and validate.
/// - If `path` is None, uses `config.yaml` in the current working directory.
/// - A missing file yields the built-in defaults only when `required` is false.
pub fn load(path: Option<&Path>, required: bool) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let mut cfg = match fs::read_to_string(path) {
        Ok(content) => serde_yaml::from_str(&content)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => Config::default(),
        Err(err) => return Err(err.into()),
    };
    cfg.apply_env();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.host.trim().is_empty() {
        return Err(ConfigError::Invalid("server.host must be non-empty"));
    }
    if cfg.server.port == 0 {
        return Err(ConfigError::Invalid("server.port must be > 0"));
    }
    if cfg.server.json_limit_bytes == 0 {
        return Err(ConfigError::Invalid("server.json_limit_bytes must be > 0"));
    }
    if cfg.database.url.trim().is_empty() {
        return Err(ConfigError::Invalid("database.url must be non-empty"));
    }
    if reqwest::Url::parse(&cfg.youtube.api_base).is_err() {
        return Err(ConfigError::Invalid("youtube.api_base must be an absolute URL"));
    }
    if cfg.youtube.channel_id.trim().is_empty() {
        return Err(ConfigError::Invalid("youtube.channel_id must be non-empty"));
    }
    Ok(())
}

/// Example configuration file.
pub fn example() -> &'static str {
    r#"server:
  host: "0.0.0.0"
  port: 5000
  json_limit_bytes: 10485760

database:
  url: "sqlite://./data/cases.db"

youtube:
  # Leave empty (or unset YOUTUBE_API_KEY) to run the checks in degraded mode.
  api_key: ""
  api_base: "https://www.googleapis.com/"
  channel_id: "UCwTShuBukB8DsgvSSu_hpWg"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert!(cfg.youtube.credential().is_none());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("server:\n  port: 8088\n").unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database, Database::default());
    }

    #[test]
    fn invalid_port() {
        let mut cfg = Config::default();
        cfg.server.port = 0;
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("server.port")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn invalid_api_base() {
        let mut cfg = Config::default();
        cfg.youtube.api_base = "not a url".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg = Config::default();
        cfg.youtube.channel_id = " ".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn api_key_override_ignores_blank() {
        let mut cfg = Config::default();
        cfg.apply_api_key(Some("  ".into()));
        assert!(cfg.youtube.credential().is_none());

        cfg.apply_api_key(Some("secret".into()));
        assert_eq!(cfg.youtube.credential(), Some("secret"));

        cfg.apply_api_key(None);
        assert_eq!(cfg.youtube.credential(), Some("secret"));
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example()).unwrap();
        let cfg = load(Some(&p), true).unwrap();
        assert_eq!(cfg.youtube.channel_id, "UCwTShuBukB8DsgvSSu_hpWg");
    }

    #[test]
    fn missing_file_falls_back_unless_required() {
        let td = tempdir().unwrap();
        let p = td.path().join("absent.yaml");
        let cfg = load(Some(&p), false).unwrap();
        assert_eq!(cfg.server, Server::default());
        assert!(matches!(load(Some(&p), true), Err(ConfigError::Io(_))));
    }
}
