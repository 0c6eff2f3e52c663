pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::AcademyClient;
pub use error::AcademyError;
pub use normalize::{normalize_article, normalize_article_id};
pub use types::{LatestArticleResponse, RawArticle};
