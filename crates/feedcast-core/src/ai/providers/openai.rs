use async_openai::{
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use super::AiProvider;
use crate::{Error, Result};

const MAX_INPUT_CHARS: usize = 4000;

fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

/// OpenAI API provider
pub struct OpenAiProvider {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompt: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str, prompt: &str) -> Self {
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        Self {
            client,
            model: model.to_string(),
            prompt: prompt.to_string(),
        }
    }

    async fn chat(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| Error::Summarizer(e.to_string()))?,
            )])
            .max_tokens(256u32)
            .build()
            .map_err(|e| Error::Summarizer(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| Error::Summarizer(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(Error::Summarizer("empty completion".to_string()));
        }

        Ok(content)
    }
}

#[async_trait::async_trait]
impl AiProvider for OpenAiProvider {
    async fn summarize(&self, content: &str) -> Result<String> {
        let truncated = truncate_chars(content, MAX_INPUT_CHARS);

        let prompt = format!("{}\n\n{}", self.prompt, truncated);

        self.chat(&prompt).await
    }
}
