mod telegram;

pub use telegram::TelegramPublisher;

use crate::Result;

/// Outbound channel seam. A delivery either succeeds or fails as a
/// unit; the notification loop retries by reconsideration, so a
/// publisher reports failure rather than papering over it.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<()>;
}

/// Plain-text message body for a published article
pub fn format_message(title: &str, summary: &str, link: &str) -> String {
    let title = title.trim();
    let summary = summary.trim();

    if summary.is_empty() {
        format!("{}\n\n{}", title, link)
    } else {
        format!("{}\n\n{}\n\n{}", title, summary, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let message = format_message(
            "Title ",
            " A short summary. ",
            "https://example.com/story",
        );
        assert_eq!(
            message,
            "Title\n\nA short summary.\n\nhttps://example.com/story"
        );
    }

    #[test]
    fn test_format_message_without_summary() {
        let message = format_message("Title", "", "https://example.com/story");
        assert_eq!(message, "Title\n\nhttps://example.com/story");
    }
}
