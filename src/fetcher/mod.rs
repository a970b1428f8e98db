pub mod graphql;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::FeedPage;

pub use graphql::GraphqlFetcher;

/// Source of item pages.
///
/// `cursor` is `None` for the first page and otherwise the `next_cursor` of
/// the previous page. `filter` is a free-text search query.
#[async_trait]
pub trait Fetcher {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        page_size: u32,
        filter: Option<&str>,
    ) -> Result<FeedPage>;
}
