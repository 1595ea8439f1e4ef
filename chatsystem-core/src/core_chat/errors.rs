//! Error types for the chat core

use super::types::{ChannelId, Principal};
use thiserror::Error;

/// Result type for chat core operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors surfaced by the registry, logs, membership sets and service facade
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No live channel has this id (never created, or already deleted)
    #[error("Channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// A live channel already uses this id
    #[error("Channel already exists: {0}")]
    ChannelExists(ChannelId),

    /// Removal of a principal that is not in the membership set
    #[error("Member not found in channel {channel}: {member}")]
    MemberNotFound { channel: ChannelId, member: Principal },
}

impl ChatError {
    /// True for every variant of the not-found kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatError::ChannelNotFound(_) | ChatError::MemberNotFound { .. })
    }

    /// Short machine-readable kind, used in transport error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::ChannelNotFound(_) | ChatError::MemberNotFound { .. } => "not_found",
            ChatError::ChannelExists(_) => "already_exists",
        }
    }
}
