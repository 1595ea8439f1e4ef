//! Request/Response bodies for the HTTP API
//!
//! Request fields are optional so that missing values produce the API's own
//! 400 response instead of a generic deserialization rejection.

use crate::core_chat::{ChannelInfo, Message};
use serde::{Deserialize, Serialize};

// ============================================================================
// Channel Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    pub id: Option<String>,
    pub topic: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChannelResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    pub id: String,
    pub owner: String,
    pub topic: String,
    pub created_at: String,
}

impl From<ChannelInfo> for ChannelResponse {
    fn from(info: ChannelInfo) -> Self {
        Self {
            id: info.id.0,
            owner: info.owner.0,
            topic: info.topic,
            created_at: info.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Message Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMessageRequest {
    pub author: Option<String>,
    pub text: Option<String>,
}

/// Query string of `GET /channels/:id/messages`; empty values mean "no filter"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub author: Option<String>,
    pub start_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub author: String,
    pub text: String,
    pub timestamp: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.0,
            author: message.author.0,
            text: message.text,
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

// ============================================================================
// Member Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub member: Option<String>,
}

// ============================================================================
// Misc
// ============================================================================

/// Plain acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub channels: usize,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
