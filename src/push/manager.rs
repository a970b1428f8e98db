use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::SubscriptionState;
use crate::push::{Permission, PushPlatform, SubscriptionRegistry};

const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);
const PERMISSION_DENIED_NOTICE: &str = "You cannot subscribe if you do not accept notifications.";

/// Push subscription state machine.
///
/// Operations run one at a time: a call made while another is in flight
/// waits for it and then acts on the state it left behind, which makes a
/// repeated `subscribe` or `unsubscribe` a no-op.
///
/// An `Error` state remembers which operation failed. Only that operation
/// may retry from it; any other operation first re-reads the platform.
pub struct SubscriptionManager {
    platform: Arc<dyn PushPlatform + Send + Sync>,
    registry: Arc<dyn SubscriptionRegistry + Send + Sync>,
    server_key: String,
    notice_ttl: Duration,
    op_lock: tokio::sync::Mutex<()>,
    status: Mutex<Status>,
    notice: Mutex<Option<Notice>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Refresh,
    Subscribe,
    Unsubscribe,
}

#[derive(Debug, Clone, Default)]
struct Status {
    current: SubscriptionState,
    failed: Option<Operation>,
}

struct Notice {
    message: String,
    raised_at: Instant,
}

impl SubscriptionManager {
    pub fn new(
        platform: Arc<dyn PushPlatform + Send + Sync>,
        registry: Arc<dyn SubscriptionRegistry + Send + Sync>,
        server_key: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            registry,
            server_key: server_key.into(),
            notice_ttl: DEFAULT_NOTICE_TTL,
            op_lock: tokio::sync::Mutex::new(()),
            status: Mutex::new(Status::default()),
            notice: Mutex::new(None),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn state(&self) -> SubscriptionState {
        lock(&self.status).current.clone()
    }

    /// The latest user-facing message, until it is older than the notice TTL.
    pub fn notice(&self) -> Option<String> {
        lock(&self.notice)
            .as_ref()
            .filter(|n| n.raised_at.elapsed() < self.notice_ttl)
            .map(|n| n.message.clone())
    }

    /// Query the platform and derive the state from it.
    pub async fn refresh(&self) -> SubscriptionState {
        let _op = self.op_lock.lock().await;
        self.read_platform().await
    }

    pub async fn subscribe(&self) -> SubscriptionState {
        let _op = self.op_lock.lock().await;

        let current = self.starting_state(Operation::Subscribe).await;
        let ready = match current {
            SubscriptionState::Unsubscribed => true,
            SubscriptionState::Error(_) => self.failed() == Some(Operation::Subscribe),
            _ => false,
        };
        if !ready {
            tracing::debug!("Ignoring subscribe in state {:?}", current);
            return current;
        }

        match self.platform.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(Permission::Denied) => {
                tracing::info!("Push permission denied");
                self.raise_notice(PERMISSION_DENIED_NOTICE);
                return self.set_state(SubscriptionState::Unsubscribed);
            }
            Err(e) => {
                return self.fail(
                    Operation::Subscribe,
                    format!("Cannot request permission: {}", e),
                )
            }
        }

        let token = match self.platform.subscribe(&self.server_key).await {
            Ok(token) => token,
            Err(e) => return self.fail(Operation::Subscribe, format!("Cannot subscribe: {}", e)),
        };

        if let Err(e) = self.registry.register_token(&token).await {
            // the platform subscription stays; refresh() will report it
            tracing::warn!("Subscribed on the platform but not registered remotely");
            return self.fail(Operation::Subscribe, format!("Cannot subscribe: {}", e));
        }

        tracing::info!("Subscribed to push notifications");
        self.set_state(SubscriptionState::Subscribed)
    }

    pub async fn unsubscribe(&self) -> SubscriptionState {
        let _op = self.op_lock.lock().await;

        let current = self.starting_state(Operation::Unsubscribe).await;
        let ready = match current {
            SubscriptionState::Subscribed => true,
            SubscriptionState::Error(_) => self.failed() == Some(Operation::Unsubscribe),
            _ => false,
        };
        if !ready {
            tracing::debug!("Ignoring unsubscribe in state {:?}", current);
            return current;
        }

        let previous = match self.platform.unsubscribe().await {
            Ok(previous) => previous,
            Err(e) => {
                return self.fail(Operation::Unsubscribe, format!("Cannot unsubscribe: {}", e))
            }
        };

        if let Some(token) = previous {
            if let Err(e) = self.registry.unregister_token(&token).await {
                tracing::warn!("Failed to unregister push token: {}", e);
            }
        }

        tracing::info!("Unsubscribed from push notifications");
        self.set_state(SubscriptionState::Unsubscribed)
    }

    /// The state `op` acts on. An error left by another operation is
    /// replaced by what the platform reports now.
    async fn starting_state(&self, op: Operation) -> SubscriptionState {
        let status = lock(&self.status).clone();
        match status.current {
            SubscriptionState::Error(_) if status.failed != Some(op) => {
                tracing::debug!("Re-reading platform after failed {:?}", status.failed);
                self.read_platform().await
            }
            current => current,
        }
    }

    async fn read_platform(&self) -> SubscriptionState {
        if !self.platform.is_available() {
            return self.set_state(SubscriptionState::Unavailable);
        }

        let next = match self.platform.current_subscription().await {
            Ok(Some(_)) => SubscriptionState::Subscribed,
            Ok(None) => SubscriptionState::Unsubscribed,
            Err(e) => {
                tracing::warn!("Cannot look up push subscription: {}", e);
                return self.record(
                    SubscriptionState::Error(e.to_string()),
                    Some(Operation::Refresh),
                );
            }
        };

        tracing::debug!("Push subscription state: {:?}", next);
        self.set_state(next)
    }

    fn failed(&self) -> Option<Operation> {
        lock(&self.status).failed
    }

    fn fail(&self, op: Operation, message: String) -> SubscriptionState {
        tracing::error!("{}", message);
        self.raise_notice(&message);
        self.record(SubscriptionState::Error(message), Some(op))
    }

    fn raise_notice(&self, message: &str) {
        *lock(&self.notice) = Some(Notice {
            message: message.to_string(),
            raised_at: Instant::now(),
        });
    }

    fn set_state(&self, next: SubscriptionState) -> SubscriptionState {
        self.record(next, None)
    }

    fn record(&self, next: SubscriptionState, failed: Option<Operation>) -> SubscriptionState {
        *lock(&self.status) = Status {
            current: next.clone(),
            failed,
        };
        next
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
