use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::{Fetcher, GraphqlFetcher};
use crate::normalizer::Normalizer;
use crate::paginator::FeedPaginator;
use crate::push::{HttpRegistry, PushPlatform, SubscriptionManager, SubscriptionRegistry};
use crate::resolver::ContentResolver;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub registry: Arc<dyn SubscriptionRegistry + Send + Sync>,
    pub normalizer: Normalizer,
    pub resolver: ContentResolver,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(GraphqlFetcher::new(
            config.api.graphql_endpoint()?,
            config.api.timeout(),
        )?);
        let registry: Arc<dyn SubscriptionRegistry + Send + Sync> =
            Arc::new(HttpRegistry::from_config(&config.api)?);

        Ok(Self::with_parts(config, fetcher, registry))
    }

    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        registry: Arc<dyn SubscriptionRegistry + Send + Sync>,
    ) -> Self {
        Self {
            config,
            fetcher,
            registry,
            normalizer: Normalizer::new(),
            resolver: ContentResolver::new(),
        }
    }

    /// A fresh paginator over the configured transport.
    pub fn paginator(&self) -> FeedPaginator {
        FeedPaginator::new(self.fetcher.clone())
    }

    /// A subscription manager for the given platform, using the configured
    /// server key and registry.
    pub fn subscription_manager(
        &self,
        platform: Arc<dyn PushPlatform + Send + Sync>,
    ) -> SubscriptionManager {
        SubscriptionManager::new(
            platform,
            self.registry.clone(),
            self.config.push.application_server_key.clone(),
        )
        .with_notice_ttl(self.config.push.notice_ttl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::domain::{FeedPage, FeedState, SubscriptionState};
    use crate::push::Permission;

    struct NoPush;

    #[async_trait]
    impl PushPlatform for NoPush {
        fn is_available(&self) -> bool {
            false
        }

        async fn request_permission(&self) -> Result<Permission> {
            Ok(Permission::Denied)
        }

        async fn subscribe(&self, _server_key: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn unsubscribe(&self) -> Result<Option<String>> {
            Ok(None)
        }

        async fn current_subscription(&self) -> Result<Option<String>> {
            Ok(None)
        }
    }

    struct EmptyFeed;

    #[async_trait]
    impl Fetcher for EmptyFeed {
        async fn fetch_page(
            &self,
            _cursor: Option<&str>,
            _page_size: u32,
            _filter: Option<&str>,
        ) -> Result<FeedPage> {
            Ok(FeedPage::default())
        }
    }

    #[tokio::test]
    async fn test_new_from_default_config() {
        let ctx = AppContext::new(Config::default()).unwrap();
        assert_eq!(ctx.paginator().state(), FeedState::default());
    }

    #[tokio::test]
    async fn test_parts_are_wired() {
        let ctx = AppContext::new(Config::default()).unwrap();
        let ctx = AppContext::with_parts(ctx.config, Arc::new(EmptyFeed), ctx.registry);

        let state = ctx.paginator().initialize(3, None).await;
        assert!(state.items.is_empty());
        assert!(!state.has_more);

        let manager = ctx.subscription_manager(Arc::new(NoPush));
        assert_eq!(manager.refresh().await, SubscriptionState::Unavailable);
    }
}
