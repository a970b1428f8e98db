pub mod item;
pub mod page;
pub mod preview;
pub mod subscription;

pub use item::{ItemKind, NormalizedItem, RawItem};
pub use page::{FeedPage, FeedState, FeedStatus};
pub use preview::{ItemMeta, PreviewDescriptor};
pub use subscription::SubscriptionState;
