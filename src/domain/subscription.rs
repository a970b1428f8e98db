use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum SubscriptionState {
    /// The platform has not been queried yet.
    #[default]
    Unknown,
    Unsubscribed,
    Subscribed,
    /// The platform has no push capability.
    Unavailable,
    Error(String),
}
