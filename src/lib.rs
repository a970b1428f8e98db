//! # flatfeed
//!
//! Retrieval and materialization core for a personal "likes" feed: items
//! collected from YouTube, Pocket, Vimeo, Tumblr and RSS, served page by
//! page from a GraphQL query API.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → FeedPaginator → Normalizer → ContentResolver → renderer
//! ```
//!
//! - [`fetcher`]: the page transport trait and its GraphQL implementation
//! - [`paginator`]: cursor pagination with ordered, de-duplicated merging
//! - [`normalizer`]: merges an item's `extra` JSON into one view model
//! - [`resolver`]: picks the embed or image used to preview an item
//! - [`push`]: push notification subscribe/unsubscribe state machine
//!
//! ## Quick Start
//!
//! ```bash
//! # First page of the feed
//! flatfeed list
//!
//! # Three pages of search results, as JSON lines
//! flatfeed list --query rust --pages 3 --json
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the transport,
/// the push registry, the normalizer and the resolver.
pub mod app;

/// Command-line interface using clap.
///
/// - `list [--query Q] [--pages N] [--json]` - Print feed items
/// - `config path` - Print the config file location
pub mod cli;

/// Configuration loaded from `~/.config/flatfeed/config.toml`.
pub mod config;

/// Value types shared by every component.
///
/// - [`RawItem`](domain::RawItem): an item as delivered by the API
/// - [`NormalizedItem`](domain::NormalizedItem): the merged view model
/// - [`FeedState`](domain::FeedState): accumulated pagination snapshot
/// - [`PreviewDescriptor`](domain::PreviewDescriptor): embed, image or none
/// - [`SubscriptionState`](domain::SubscriptionState): push opt-in state
pub mod domain;

/// Page transport.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for fetching one page
/// - [`GraphqlFetcher`](fetcher::GraphqlFetcher): reqwest-based implementation
pub mod fetcher;

/// Item normalization.
pub mod normalizer;

/// Incremental feed pagination.
pub mod paginator;

/// Push notification subscriptions.
///
/// - [`PushPlatform`](push::PushPlatform): injected platform capability
/// - [`SubscriptionRegistry`](push::SubscriptionRegistry): remote token store
/// - [`SubscriptionManager`](push::SubscriptionManager): the state machine
pub mod push;

/// Preview media resolution.
pub mod resolver;
