//! Chat Service - the single entry point for transports
//!
//! # Responsibilities
//!
//! - **Channel lifecycle**: create / get / delete through the registry
//! - **Messages**: post and filtered listing on the channel's log
//! - **Membership**: add / list / remove on the channel's member set
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  ChatService        │
//! └────────┬────────────┘
//!          ▼
//!   ChannelRegistry ──► Arc<Channel> ──► MessageLog / MembershipSet
//! ```
//!
//! Each request resolves its channel exactly once. The per-channel operation
//! then re-validates under the channel lock, so a delete racing with the
//! request surfaces as `ChannelNotFound` and never as a partial result.

use super::channel::ChannelInfo;
use super::clock::{SharedClock, SystemClock};
use super::errors::{ChatError, ChatResult};
use super::message_log::{Message, MessageFilter};
use super::registry::ChannelRegistry;
use super::types::{ChannelId, Principal};
use crate::metrics::{self, Timer};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Coordinates registry, logs and membership sets
pub struct ChatService {
    registry: ChannelRegistry,
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ChatService {
    /// Create a service whose message timestamps come from `clock`
    pub fn new(clock: SharedClock) -> Self {
        info!("Creating ChatService");
        Self {
            registry: ChannelRegistry::new(clock),
        }
    }

    /// Create a channel with `owner` as its first member
    ///
    /// # Errors
    ///
    /// [`ChatError::ChannelExists`] if `id` is already registered.
    pub async fn create_channel(
        &self,
        id: ChannelId,
        topic: String,
        owner: Principal,
    ) -> ChatResult<ChannelInfo> {
        let channel = self
            .registry
            .create(id, topic, owner)
            .await
            .map_err(rejected)?;

        metrics::record_counter(metrics::CHANNELS_CREATED, 1);
        metrics::record_gauge(metrics::CHANNELS_ACTIVE, self.registry.len().await as f64);
        Ok(channel.info().clone())
    }

    pub async fn get_channel(&self, id: &ChannelId) -> ChatResult<ChannelInfo> {
        let channel = self.registry.get(id).await.map_err(rejected)?;
        Ok(channel.info().clone())
    }

    /// Delete the channel together with its messages and members
    pub async fn delete_channel(&self, id: &ChannelId) -> ChatResult<()> {
        self.registry.delete(id).await.map_err(rejected)?;

        metrics::record_counter(metrics::CHANNELS_DELETED, 1);
        metrics::record_gauge(metrics::CHANNELS_ACTIVE, self.registry.len().await as f64);
        Ok(())
    }

    /// Append a message; the returned copy carries the assigned timestamp
    pub async fn post_message(
        &self,
        id: &ChannelId,
        author: Principal,
        text: String,
    ) -> ChatResult<Message> {
        let channel = self.registry.get(id).await.map_err(rejected)?;
        let message = channel.append(author, text).await.map_err(rejected)?;

        debug!(
            channel_id = %id,
            author = %message.author,
            seq = message.seq,
            "Message posted"
        );
        metrics::record_counter(metrics::MESSAGES_APPENDED, 1);
        Ok(message)
    }

    /// Messages matching `filter`, in posting order
    pub async fn list_messages(
        &self,
        id: &ChannelId,
        filter: &MessageFilter,
    ) -> ChatResult<Vec<Message>> {
        let timer = Timer::new(metrics::MESSAGES_QUERY_DURATION);
        let channel = self.registry.get(id).await.map_err(rejected)?;
        let messages = channel.query(filter).await.map_err(rejected)?;
        timer.stop();

        debug!(
            channel_id = %id,
            author = ?filter.author,
            start_at = ?filter.start_at,
            returned = messages.len(),
            "Messages listed"
        );
        Ok(messages)
    }

    /// Register a member; registering an existing member is not an error
    ///
    /// Returns whether the member was newly added.
    pub async fn add_member(&self, id: &ChannelId, member: Principal) -> ChatResult<bool> {
        let channel = self.registry.get(id).await.map_err(rejected)?;
        let added = channel.add_member(member.clone()).await.map_err(rejected)?;

        if added {
            debug!(channel_id = %id, member = %member, "Member added");
            metrics::record_counter(metrics::MEMBERS_ADDED, 1);
        }
        Ok(added)
    }

    pub async fn list_members(&self, id: &ChannelId) -> ChatResult<Vec<Principal>> {
        let channel = self.registry.get(id).await.map_err(rejected)?;
        channel.members().await.map_err(rejected)
    }

    /// Remove a member
    ///
    /// The owner can be removed like any other member; the channel's `owner`
    /// attribute keeps its value.
    pub async fn remove_member(&self, id: &ChannelId, member: &Principal) -> ChatResult<()> {
        let channel = self.registry.get(id).await.map_err(rejected)?;
        channel.remove_member(member).await.map_err(rejected)?;

        debug!(channel_id = %id, member = %member, "Member removed");
        metrics::record_counter(metrics::MEMBERS_REMOVED, 1);
        Ok(())
    }

    pub async fn channel_count(&self) -> usize {
        self.registry.len().await
    }
}

fn rejected(err: ChatError) -> ChatError {
    warn!(kind = err.kind(), "{}", err);
    metrics::record_counter(metrics::REQUESTS_REJECTED, 1);
    err
}
