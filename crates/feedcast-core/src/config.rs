use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            fetch: FetchConfig::default(),
            notify: NotifyConfig::default(),
            ai: AiConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Bind address for the health endpoint
    #[serde(default = "default_health_addr")]
    pub health_addr: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            health_addr: default_health_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds between fetch sweeps over all sources
    #[serde(default = "default_fetch_interval")]
    pub interval_secs: u64,
    /// Per-request HTTP timeout when retrieving feeds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Keep only items whose title or body contains one of these
    /// keywords (case-insensitive). Empty list keeps everything.
    #[serde(default)]
    pub filter_keywords: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_fetch_interval(),
            request_timeout_secs: default_request_timeout(),
            filter_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Seconds between notification ticks (one article per tick)
    #[serde(default = "default_notify_interval")]
    pub interval_secs: u64,
    /// Freshness window: articles published earlier than
    /// now - lookback_window_secs are never selected. Should exceed
    /// the fetch interval so items survive a second observation
    /// before becoming eligible.
    #[serde(default = "default_lookback_window")]
    pub lookback_window_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_notify_interval(),
            lookback_window_secs: default_lookback_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// AI provider, currently only "openai"
    #[serde(default = "default_ai_provider")]
    pub provider: String,
    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Prompt prepended to the article text
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Timeout for one summarization call
    #[serde(default = "default_ai_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_ai_provider(),
            openai_api_key: None,
            model: default_model(),
            prompt: default_prompt(),
            request_timeout_secs: default_ai_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token used for publishing
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Channel the daemon publishes to, e.g. "@mychannel" or a chat id
    #[serde(default)]
    pub channel_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: String::new(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feedcast")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_health_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_fetch_interval() -> u64 {
    600 // 10 minutes - full sweep over all sources
}

fn default_request_timeout() -> u64 {
    30
}

fn default_notify_interval() -> u64 {
    1200 // 20 minutes - one published article per tick
}

fn default_lookback_window() -> u64 {
    1200 // 2x the default fetch interval
}

fn default_ai_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_prompt() -> String {
    "Summarize the following article in 2-3 sentences. Be concise and focus on the key points:".to_string()
}

fn default_ai_timeout() -> u64 {
    60
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("feedcast")
            .join("config.toml")
    }

    /// Get the database file path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("feedcast.db")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.fetch.interval_secs, 600);
        assert_eq!(config.notify.interval_secs, 1200);
        assert_eq!(config.notify.lookback_window_secs, 1200);
        assert!(config.fetch.filter_keywords.is_empty());
        assert_eq!(config.ai.provider, "openai");
        assert!(config.telegram.bot_token.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [fetch]
            interval_secs = 60
            filter_keywords = ["rust", "Tokio"]

            [telegram]
            bot_token = "123:abc"
            channel_id = "@news"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.interval_secs, 60);
        assert_eq!(config.fetch.filter_keywords.len(), 2);
        // Untouched sections fall back to defaults
        assert_eq!(config.notify.interval_secs, 1200);
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
    }
}
