mod article_repo;
mod database;
mod source_repo;

pub use article_repo::ArticleRepository;
pub use database::Database;
pub use source_repo::SourceRepository;
