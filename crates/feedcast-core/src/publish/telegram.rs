use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::Publisher;
use crate::{Error, Result};

/// Publishes plain-text messages to a Telegram channel via the Bot API
#[derive(Clone)]
pub struct TelegramPublisher {
    client: Client,
    bot_token: String,
    chat_id: String,
    timeout: Duration,
    max_retries: u8,
}

impl TelegramPublisher {
    pub fn new(bot_token: &str, chat_id: &str) -> Self {
        Self {
            client: Client::new(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    fn api_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }

    fn describe_failure(body: &[u8], status: reqwest::StatusCode) -> String {
        // Telegram errors carry a human-readable description
        match serde_json::from_slice::<ApiResponse>(body) {
            Ok(ApiResponse {
                description: Some(description),
                ..
            }) => format!("HTTP {}: {}", status, description),
            _ => format!("HTTP {}", status),
        }
    }
}

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[allow(dead_code)]
    ok: bool,
    description: Option<String>,
}

#[async_trait::async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        let payload = SendMessagePayload {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: false,
        };

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let result = self
                .client
                .post(self.api_url())
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(());
                    }

                    let body = response.bytes().await.unwrap_or_default();
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(Error::Publish(Self::describe_failure(&body, status)));
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(Error::Publish(format!("sendMessage request failed: {}", e)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_embeds_token() {
        let publisher = TelegramPublisher::new("123:abc", "@news")
            .with_timeout(5)
            .with_retries(1);
        assert_eq!(
            publisher.api_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(publisher.timeout, Duration::from_secs(5));
        assert_eq!(publisher.max_retries, 1);
    }

    #[test]
    fn test_payload_field_names_match_bot_api() {
        let payload = SendMessagePayload {
            chat_id: "@news",
            text: "hello",
            disable_web_page_preview: false,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["chat_id"], "@news");
        assert_eq!(value["text"], "hello");
        assert_eq!(value["disable_web_page_preview"], false);
    }

    #[test]
    fn test_failure_description_uses_api_body() {
        let body = br#"{"ok":false,"description":"Bad Request: chat not found"}"#;
        let message =
            TelegramPublisher::describe_failure(body, reqwest::StatusCode::BAD_REQUEST);
        assert!(message.contains("chat not found"));
    }
}
