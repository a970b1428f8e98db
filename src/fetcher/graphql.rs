use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::app::{FlatfeedError, Result};
use crate::domain::{FeedPage, RawItem};
use crate::fetcher::Fetcher;

const ITEMS_QUERY: &str = r#"
query getItems($first: Int = 3, $cursor: String, $query: String) {
  items(first: $first, sort: TIMESTAMP_DESC, after: $cursor, q: $query) {
    edges {
      node {
        id
        type
        title
        url
        timestamp
        extra
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

/// Fetches pages from the `items` connection of the GraphQL API.
pub struct GraphqlFetcher {
    client: Client,
    endpoint: Url,
}

impl GraphqlFetcher {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("flatfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Fetcher for GraphqlFetcher {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        page_size: u32,
        filter: Option<&str>,
    ) -> Result<FeedPage> {
        let body = json!({
            "query": ITEMS_QUERY,
            "variables": {
                "first": page_size,
                "cursor": cursor,
                "query": filter,
            },
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        response.error_for_status_ref()?;

        let payload: ItemsResponse = response.json().await?;
        let page = payload.into_page()?;
        tracing::debug!(
            "Fetched {} items from {} (has_more: {})",
            page.items.len(),
            self.endpoint,
            page.has_more
        );
        Ok(page)
    }
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    data: Option<ItemsData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct ItemsData {
    items: Option<ItemConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemConnection {
    edges: Vec<ItemEdge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct ItemEdge {
    node: RawItem,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

impl ItemsResponse {
    fn into_page(self) -> Result<FeedPage> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(FlatfeedError::Graphql(messages.join("; ")));
        }

        // a response without a connection ends pagination
        let Some(connection) = self.data.and_then(|data| data.items) else {
            return Ok(FeedPage::default());
        };

        Ok(FeedPage {
            items: connection.edges.into_iter().map(|edge| edge.node).collect(),
            next_cursor: connection.page_info.end_cursor,
            has_more: connection.page_info.has_next_page,
        })
    }
}
