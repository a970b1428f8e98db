use serde::{Deserialize, Serialize};

use super::RawItem;

/// One page as returned by the transport.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<RawItem>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
}

/// Snapshot of the accumulated feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedState {
    pub items: Vec<RawItem>,
    pub cursor: Option<String>,
    pub has_more: bool,
    pub status: FeedStatus,
}

impl FeedState {
    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FeedStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}
