//! Chat core: channels, their ordered message logs and membership sets
//!
//! Leaves first: `types`/`clock` → `message_log`, `membership` → `channel` →
//! `registry` → `service`. Transports only talk to [`ChatService`].

pub mod channel;
pub mod clock;
pub mod errors;
pub mod membership;
pub mod message_log;
pub mod registry;
pub mod service;
pub mod types;

// Re-exports
pub use channel::{Channel, ChannelInfo};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use errors::{ChatError, ChatResult};
pub use membership::MembershipSet;
pub use message_log::{Message, MessageFilter, MessageLog};
pub use registry::ChannelRegistry;
pub use service::ChatService;
pub use types::{ChannelId, MessageId, ParseTimestampError, Principal, Timestamp};
