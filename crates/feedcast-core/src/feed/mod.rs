mod fetcher;
mod filter;
mod models;
mod parser;

pub use fetcher::FeedFetcher;
pub use filter::KeywordFilter;
pub use models::{Article, NewArticle, NewSource, Source};
pub use parser::parse_feed;
