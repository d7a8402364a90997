use std::sync::Arc;
use std::time::Duration;

use super::providers::{AiProvider, OpenAiProvider};
use crate::config::AppConfig;
use crate::{Error, Result};

/// AI summarizer that wraps the configured provider and bounds every
/// call with a timeout
pub struct Summarizer {
    provider: Arc<dyn AiProvider>,
    timeout: Duration,
}

impl Summarizer {
    /// Create a new summarizer based on configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let provider: Arc<dyn AiProvider> = match config.ai.provider.as_str() {
            "openai" => {
                let api_key = config.ai.openai_api_key.as_ref().ok_or_else(|| {
                    Error::Config("OpenAI API key not configured".to_string())
                })?;
                Arc::new(OpenAiProvider::new(
                    api_key,
                    &config.ai.model,
                    &config.ai.prompt,
                ))
            }
            other => {
                return Err(Error::Config(format!("Unknown AI provider: {}", other)));
            }
        };

        Ok(Self {
            provider,
            timeout: Duration::from_secs(config.ai.request_timeout_secs),
        })
    }

    /// Build a summarizer around an explicit provider
    pub fn with_provider(provider: Arc<dyn AiProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Generate a summary for article content. A hung provider counts
    /// as a failure, not a stall: the call is abandoned at the timeout.
    pub async fn summarize(&self, content: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.provider.summarize(content)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Summarizer(format!(
                "summarization timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowProvider;

    #[async_trait::async_trait]
    impl AiProvider for SlowProvider {
        async fn summarize(&self, _content: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("never".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_turns_a_hung_provider_into_an_error() {
        let summarizer =
            Summarizer::with_provider(Arc::new(SlowProvider), Duration::from_secs(1));

        let result = summarizer.summarize("text").await;
        assert!(matches!(result, Err(Error::Summarizer(_))));
    }

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        let config = AppConfig::default();
        assert!(matches!(
            Summarizer::new(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut config = AppConfig::default();
        config.ai.provider = "prophecy".to_string();
        assert!(matches!(
            Summarizer::new(&config),
            Err(Error::Config(_))
        ));
    }
}
