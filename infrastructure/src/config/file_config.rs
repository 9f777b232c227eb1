//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use chatbridge_domain::Model;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("provider.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("provider.base_url must be an http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),

    #[error("provider.api_key_env cannot be empty")]
    EmptyApiKeyEnv,

    #[error("tui.poll_interval_ms cannot be 0")]
    InvalidPollInterval,

    #[error("tui.read_buffer_size cannot be 0")]
    InvalidReadBufferSize,
}

/// Completion provider configuration (`[provider]` section)
///
/// # Example
///
/// ```toml
/// [provider]
/// base_url = "https://api.openai.com"
/// model = "gpt-4o"
/// api_key_env = "OPENAI_API_KEY"
/// timeout_seconds = 120
/// system_prompt = "Answer briefly."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model used for every request
    pub model: Model,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY")
    pub api_key_env: String,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// Timeout for establishing a completion stream
    pub timeout_seconds: u64,
    /// Optional system message placed at the start of every conversation
    pub system_prompt: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: Model::default(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 120,
            system_prompt: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: `api_key` wins, then the `api_key_env` variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Interactive mode configuration (`[tui]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTuiConfig {
    /// How often the active reply is polled, in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum bytes taken from the reply per poll
    pub read_buffer_size: usize,
}

impl Default for FileTuiConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            read_buffer_size: 1024,
        }
    }
}

impl FileTuiConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Logging configuration (`[logging]` section)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of conversation events
    pub conversation_log: Option<PathBuf>,
    /// Diagnostic log file used by the interactive mode
    pub log_file: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub tui: FileTuiConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let base_url = self.provider.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(
                self.provider.base_url.clone(),
            ));
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }

        if self.tui.poll_interval_ms == 0 {
            return Err(ConfigValidationError::InvalidPollInterval);
        }

        if self.tui.read_buffer_size == 0 {
            return Err(ConfigValidationError::InvalidReadBufferSize);
        }

        Ok(())
    }

    /// Copy with secrets masked, for `--show-config`
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.provider.api_key.is_some() {
            config.provider.api_key = Some("<redacted>".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
base_url = "http://localhost:8080"
model = "gpt-4o"
api_key_env = "LOCAL_KEY"
timeout_seconds = 30
system_prompt = "Be brief."

[tui]
poll_interval_ms = 20
read_buffer_size = 256

[logging]
conversation_log = "/tmp/chat.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.base_url, "http://localhost:8080");
        assert_eq!(config.provider.model, Model::Gpt4o);
        assert_eq!(config.provider.api_key_env, "LOCAL_KEY");
        assert_eq!(config.provider.timeout(), Duration::from_secs(30));
        assert_eq!(config.provider.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(config.tui.poll_interval(), Duration::from_millis(20));
        assert_eq!(config.tui.read_buffer_size, 256);
        assert_eq!(
            config.logging.conversation_log,
            Some(PathBuf::from("/tmp/chat.jsonl"))
        );
        assert!(config.logging.log_file.is_none());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[provider]
model = "my-finetune"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.provider.model,
            Model::Custom("my-finetune".to_string())
        );
        // Defaults should apply
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.tui, FileTuiConfig::default());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.provider.model, Model::Gpt35Turbo1106);
        assert_eq!(config.provider.base_url, "https://api.openai.com");
        assert!(config.provider.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = FileConfig::default();
        config.provider.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = FileConfig::default();
        config.provider.base_url = "api.openai.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_validate_tui_values() {
        let mut config = FileConfig::default();
        config.tui.read_buffer_size = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidReadBufferSize)
        );

        let mut config = FileConfig::default();
        config.tui.poll_interval_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidPollInterval)
        );
    }

    #[test]
    fn test_empty_model_is_rejected() {
        let toml_str = r#"
[provider]
model = ""
"#;
        assert!(toml::from_str::<FileConfig>(toml_str).is_err());
    }

    #[test]
    fn test_resolve_api_key_prefers_direct_key() {
        let config = FileProviderConfig {
            api_key: Some("sk-direct".to_string()),
            api_key_env: "CHATBRIDGE_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-direct"));
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let config = FileProviderConfig {
            api_key: Some(String::new()),
            api_key_env: "CHATBRIDGE_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let mut config = FileConfig::default();
        config.provider.api_key = Some("sk-secret".to_string());
        let shown = toml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
