//! ChatSystem core: channels with ordered message logs and membership sets,
//! served over HTTP.

pub mod config;
pub mod core_chat;
pub mod http_api;
pub mod logging;
pub mod metrics;
pub mod shutdown;

pub use core_chat::{
    ChannelId, ChatError, ChatService, Message, MessageFilter, Principal, Timestamp,
};
pub use logging::{init_logging_with_config, LogConfig, LogLevel};
