use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::app::{FlatfeedError, Result};
use crate::config::ApiConfig;

/// Remote store of subscription tokens, used to send notifications later.
#[async_trait]
pub trait SubscriptionRegistry {
    async fn register_token(&self, token: &str) -> Result<()>;
    async fn unregister_token(&self, token: &str) -> Result<()>;
}

/// Registry backed by the API's `push/subscribe` and `push/unsubscribe`
/// endpoints.
pub struct HttpRegistry {
    client: Client,
    subscribe_url: Url,
    unsubscribe_url: Url,
}

impl HttpRegistry {
    pub fn new(subscribe_url: Url, unsubscribe_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flatfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            subscribe_url,
            unsubscribe_url,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            api.push_subscribe_endpoint()?,
            api.push_unsubscribe_endpoint()?,
            api.timeout(),
        )
    }

    async fn post(&self, url: &Url, token: &str) -> Result<()> {
        let response = self
            .client
            .post(url.clone())
            .json(&token_body(token))
            .send()
            .await?;
        response.error_for_status_ref()?;
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRegistry for HttpRegistry {
    async fn register_token(&self, token: &str) -> Result<()> {
        self.post(&self.subscribe_url, token)
            .await
            .map_err(|e| FlatfeedError::Registration(e.to_string()))
    }

    async fn unregister_token(&self, token: &str) -> Result<()> {
        self.post(&self.unsubscribe_url, token)
            .await
            .map_err(|e| FlatfeedError::Registration(e.to_string()))
    }
}

/// Subscriptions serialized as JSON objects are posted as-is; anything else
/// is wrapped as `{"token": ...}`.
fn token_body(token: &str) -> Value {
    serde_json::from_str::<Value>(token)
        .ok()
        .filter(Value::is_object)
        .unwrap_or_else(|| json!({ "token": token }))
}
