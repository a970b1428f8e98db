//! Push notification opt-in/opt-out.
//!
//! The platform push service and the remote token registry are injected
//! collaborators; [`SubscriptionManager`] drives them as a state machine.

pub mod manager;
pub mod registry;

use async_trait::async_trait;

use crate::app::Result;

pub use manager::SubscriptionManager;
pub use registry::{HttpRegistry, SubscriptionRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Platform push capability (browser push manager or equivalent).
///
/// Tokens are the platform's serialized subscription, opaque here.
#[async_trait]
pub trait PushPlatform {
    fn is_available(&self) -> bool;

    /// Ask the user; suspends until they answer.
    async fn request_permission(&self) -> Result<Permission>;

    async fn subscribe(&self, server_key: &str) -> Result<String>;

    /// Drop the current subscription, returning it if there was one.
    async fn unsubscribe(&self) -> Result<Option<String>>;

    async fn current_subscription(&self) -> Result<Option<String>>;
}
