use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
    time::Duration,
};

use documented::{Documented, DocumentedFields};
use grelease_dl::http_client::{ClientConfig, API_URL, API_VERSION, DEFAULT_TIMEOUT};
use grelease_inspect::{policy::VERSION_333, ValidationPolicy};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::info;

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
    path::xdg_config_home,
};

pub const DEFAULT_MAX_CALLS: u32 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Application's configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Base URL of the GitHub REST API.
    /// Default: https://api.github.com
    pub api_url: Option<String>,

    /// Value of the X-GitHub-Api-Version request header.
    /// Default: 2022-11-28
    pub api_version: Option<String>,

    /// User agent sent with every request.
    /// Default: grelease/<version>
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds, between 1 and 300.
    /// Default: 10
    pub timeout_secs: Option<u64>,

    /// Maximum number of page requests per sync. Each page holds up to 100 releases.
    /// Default: 10
    pub max_calls: Option<u32>,

    /// Release validation policy
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Release validation policy
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct PolicyConfig {
    /// Accept draft releases.
    /// Default: false
    pub include_draft: Option<bool>,

    /// Accept prereleases.
    /// Default: false
    pub include_prerelease: Option<bool>,

    /// Regular expression every accepted tag must match. Add `$` to reject trailing text.
    /// Default: ^v[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}
    pub tag_pattern: Option<String>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("GRELEASE_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("grelease").join("config.toml"),
    })
});

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|poisoned| poisoned.into_inner().to_path_buf())
}

pub fn set_config_path(path: PathBuf) {
    let mut config_path = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *config_path = path;
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            api_url: Some(API_URL.to_string()),
            api_version: Some(API_VERSION.to_string()),
            user_agent: ClientConfig::default().user_agent,
            timeout_secs: Some(DEFAULT_TIMEOUT.as_secs()),
            max_calls: Some(DEFAULT_MAX_CALLS),
            policy: PolicyConfig {
                include_draft: Some(false),
                include_prerelease: Some(false),
                tag_pattern: Some(VERSION_333.to_string()),
            },
        }
    }

    /// Loads the configuration file at [`CONFIG_PATH`].
    /// If the file is not found, the default configuration is used.
    pub fn new() -> Result<Self> {
        let config_path = config_path();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default_config(),
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validates the configuration and fills unset fields with defaults.
    pub fn resolve(&mut self) -> Result<()> {
        let timeout = *self.timeout_secs.get_or_insert(DEFAULT_TIMEOUT.as_secs());
        if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::InvalidTimeout(timeout));
        }

        let max_calls = *self.max_calls.get_or_insert(DEFAULT_MAX_CALLS);
        if max_calls < 1 {
            return Err(ConfigError::InvalidMaxCalls(max_calls));
        }

        self.api_url.get_or_insert_with(|| API_URL.to_string());
        self.api_version.get_or_insert_with(|| API_VERSION.to_string());
        self.policy.include_draft.get_or_insert(false);
        self.policy.include_prerelease.get_or_insert(false);
        self.policy
            .tag_pattern
            .get_or_insert_with(|| VERSION_333.to_string());

        self.policy()?;

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls.unwrap_or(DEFAULT_MAX_CALLS)
    }

    /// Transport settings for the release client.
    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            api_url: self.api_url.clone().unwrap_or(defaults.api_url),
            api_version: self.api_version.clone().unwrap_or(defaults.api_version),
            user_agent: self.user_agent.clone().or(defaults.user_agent),
            timeout: self.timeout(),
            ..defaults
        }
    }

    /// Compiles the configured validation policy.
    pub fn policy(&self) -> Result<ValidationPolicy> {
        let pattern = self.policy.tag_pattern.as_deref().unwrap_or(VERSION_333);
        let policy = ValidationPolicy::with_pattern(pattern)?
            .include_draft(self.policy.include_draft.unwrap_or(false))
            .include_prerelease(self.policy.include_prerelease.unwrap_or(false));
        Ok(policy)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(policy_table) = doc.get_mut("policy").and_then(|p| p.as_table_mut()) {
            annotate_toml_table::<PolicyConfig>(policy_table, true)?;
        }

        Ok(doc)
    }
}

pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.api_url.as_deref(), Some("https://api.github.com"));
        assert_eq!(config.api_version.as_deref(), Some("2022-11-28"));
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.max_calls, Some(10));
        assert_eq!(config.policy.include_draft, Some(false));
        assert_eq!(config.policy.tag_pattern.as_deref(), Some(VERSION_333));
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let mut config = Config::from_toml("").unwrap();
        config.resolve().unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_calls(), 10);
        assert_eq!(config.api_url.as_deref(), Some(API_URL));
        assert_eq!(config.policy.include_prerelease, Some(false));
    }

    #[test]
    fn test_partial_toml() {
        let mut config = Config::from_toml(
            r#"
            max_calls = 3

            [policy]
            include_prerelease = true
            tag_pattern = '^release-[0-9]+$'
            "#,
        )
        .unwrap();
        config.resolve().unwrap();

        assert_eq!(config.max_calls(), 3);
        let policy = config.policy().unwrap();
        assert!(policy.include_prerelease);
        assert!(!policy.include_draft);
        assert!(policy.tag_matches("release-12"));
        assert!(!policy.tag_matches("release-12a"));
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let mut config = Config::from_toml("timeout_secs = 0").unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidTimeout(0))));

        let mut config = Config::from_toml("timeout_secs = 301").unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidTimeout(301))));

        let mut config = Config::from_toml("max_calls = 0").unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidMaxCalls(0))));

        let mut config = Config::from_toml("[policy]\ntag_pattern = '(unclosed'").unwrap();
        assert!(matches!(config.resolve(), Err(ConfigError::Policy(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("max_calls = \"many\""),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    fn test_client_config() {
        let mut config = Config::from_toml(
            r#"
            api_url = "http://localhost:9000"
            timeout_secs = 4
            user_agent = "ci-bot"
            "#,
        )
        .unwrap();
        config.resolve().unwrap();

        let client = config.client_config();
        assert_eq!(client.api_url, "http://localhost:9000");
        assert_eq!(client.api_version, API_VERSION);
        assert_eq!(client.timeout, Duration::from_secs(4));
        assert_eq!(client.user_agent.as_deref(), Some("ci-bot"));
    }

    #[test]
    fn test_default_config_round_trip() {
        let config = Config::default_config();
        let doc = config.to_annotated_document().unwrap().to_string();
        let parsed = Config::from_toml(&doc).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    #[serial]
    fn test_new_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let previous = config_path();
        set_config_path(dir.path().join("missing.toml"));

        let config = Config::new();
        set_config_path(previous);

        assert_eq!(config.unwrap(), {
            let mut def = Config::default_config();
            def.resolve().unwrap();
            def
        });
    }

    #[test]
    #[serial]
    fn test_generate_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let previous = config_path();
        let path = dir.path().join("grelease").join("config.toml");
        set_config_path(path.clone());

        let first = generate_default_config();
        let second = generate_default_config();
        let loaded = Config::new();
        set_config_path(previous);

        assert_eq!(first.unwrap(), path);
        assert!(matches!(second, Err(ConfigError::ConfigAlreadyExists)));
        assert_eq!(loaded.unwrap().max_calls(), DEFAULT_MAX_CALLS);
    }
}
