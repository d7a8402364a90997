mod openai;

pub use openai::OpenAiProvider;

use crate::Result;

/// Trait for AI summarization providers
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate a short summary for the given article text
    async fn summarize(&self, content: &str) -> Result<String>;
}
