//! Channel Registry - process-wide id → channel map
//!
//! The map lock is held only for the lookup or insert itself. All per-channel
//! work happens on the returned `Arc<Channel>` under that channel's own lock.
//! Delete is the exception: it holds the map write guard while it waits for
//! the channel lock, so locks are always taken map first, then channel.

use super::channel::Channel;
use super::clock::SharedClock;
use super::errors::{ChatError, ChatResult};
use super::types::{ChannelId, Principal};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct ChannelRegistry {
    channels: RwLock<HashMap<ChannelId, Arc<Channel>>>,
    clock: SharedClock,
}

impl ChannelRegistry {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Register a new channel whose only member is `owner`
    ///
    /// Duplicate ids are rejected with [`ChatError::ChannelExists`]; the
    /// existing channel is left untouched.
    pub async fn create(
        &self,
        id: ChannelId,
        topic: String,
        owner: Principal,
    ) -> ChatResult<Arc<Channel>> {
        let mut channels = self.channels.write().await;
        if channels.contains_key(&id) {
            return Err(ChatError::ChannelExists(id));
        }

        let channel = Arc::new(Channel::new(id.clone(), topic, owner, self.clock.clone()));
        channels.insert(id, channel.clone());
        info!(channel_id = %channel.id(), owner = %channel.info().owner, "Channel created");
        Ok(channel)
    }

    pub async fn get(&self, id: &ChannelId) -> ChatResult<Arc<Channel>> {
        self.channels
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::ChannelNotFound(id.clone()))
    }

    /// Close the channel, then unregister it
    ///
    /// The map write guard is held across the close, and the entry is only
    /// removed once the close has finished. A delete dropped while waiting for
    /// the channel lock leaves the channel registered and open.
    pub async fn delete(&self, id: &ChannelId) -> ChatResult<()> {
        let mut channels = self.channels.write().await;
        let channel = channels
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::ChannelNotFound(id.clone()))?;

        channel.close().await;
        channels.remove(id);
        drop(channels);

        info!(channel_id = %id, "Channel deleted");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.channels.read().await.is_empty()
    }
}
