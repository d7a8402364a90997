use super::models::NewArticle;

/// Keyword filter applied to fetched items before storage.
/// An item is kept when no keywords are configured, or when its title
/// or body contains at least one keyword, case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches(&self, article: &NewArticle) -> bool {
        if self.keywords.is_empty() {
            return true;
        }

        let title = article.title.to_lowercase();
        let body = article
            .content_text
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.keywords
            .iter()
            .any(|k| title.contains(k) || body.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(title: &str, body: Option<&str>) -> NewArticle {
        NewArticle {
            source_id: Uuid::new_v4(),
            title: title.to_string(),
            link: "https://example.com/item".to_string(),
            content_text: body.map(str::to_string),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = KeywordFilter::new(&[]);
        assert!(filter.is_empty());
        assert!(filter.matches(&item("anything", None)));
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let filter = KeywordFilter::new(&["Rust".to_string()]);
        assert!(filter.matches(&item("Why RUST keeps winning", None)));
        assert!(!filter.matches(&item("Go generics revisited", None)));
    }

    #[test]
    fn test_body_match_counts() {
        let filter = KeywordFilter::new(&["tokio".to_string()]);
        assert!(filter.matches(&item("Runtime news", Some("Tokio 1.43 released"))));
        assert!(!filter.matches(&item("Runtime news", Some("nothing relevant"))));
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let filter = KeywordFilter::new(&["  ".to_string(), String::new()]);
        assert!(filter.is_empty());
    }
}
