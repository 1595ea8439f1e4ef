//! Channel: immutable descriptor plus lock-guarded log and membership
//!
//! # Locking
//!
//! ```text
//! Channel
//!  ├─ id / topic / owner / created_at      (immutable, no lock)
//!  └─ RwLock<ChannelState>
//!       ├─ MessageLog
//!       ├─ MembershipSet
//!       └─ closed
//! ```
//!
//! Writers (append, member add/remove, close) take the write lock, readers the
//! read lock. Every operation checks `closed` under the lock, so a handle that
//! was resolved just before a delete fails with `ChannelNotFound` instead of
//! touching a torn-down channel.

use super::clock::SharedClock;
use super::errors::{ChatError, ChatResult};
use super::membership::MembershipSet;
use super::message_log::{Message, MessageFilter, MessageLog};
use super::types::{ChannelId, Principal, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Public record of a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub topic: String,
    pub owner: Principal,
    pub created_at: Timestamp,
}

#[derive(Debug)]
struct ChannelState {
    log: MessageLog,
    members: MembershipSet,
    closed: bool,
}

impl ChannelState {
    fn ensure_open(&self, id: &ChannelId) -> ChatResult<()> {
        if self.closed {
            return Err(ChatError::ChannelNotFound(id.clone()));
        }
        Ok(())
    }
}

/// A live channel
#[derive(Debug)]
pub struct Channel {
    info: ChannelInfo,
    state: RwLock<ChannelState>,
}

impl Channel {
    pub(crate) fn new(id: ChannelId, topic: String, owner: Principal, clock: SharedClock) -> Self {
        let created_at = clock.now();
        let members = MembershipSet::with_owner(owner.clone());
        Self {
            info: ChannelInfo {
                id,
                topic,
                owner,
                created_at,
            },
            state: RwLock::new(ChannelState {
                log: MessageLog::new(clock),
                members,
                closed: false,
            }),
        }
    }

    pub fn id(&self) -> &ChannelId {
        &self.info.id
    }

    pub fn info(&self) -> &ChannelInfo {
        &self.info
    }

    /// Append a message; timestamp assignment and push happen under one guard
    pub async fn append(&self, author: Principal, text: String) -> ChatResult<Message> {
        let mut state = self.state.write().await;
        state.ensure_open(self.id())?;
        Ok(state.log.append(author, text))
    }

    pub async fn query(&self, filter: &MessageFilter) -> ChatResult<Vec<Message>> {
        let state = self.state.read().await;
        state.ensure_open(self.id())?;
        Ok(state.log.query(filter))
    }

    /// Returns whether the member was newly added
    pub async fn add_member(&self, member: Principal) -> ChatResult<bool> {
        let mut state = self.state.write().await;
        state.ensure_open(self.id())?;
        Ok(state.members.add(member))
    }

    pub async fn remove_member(&self, member: &Principal) -> ChatResult<()> {
        let mut state = self.state.write().await;
        state.ensure_open(self.id())?;
        state
            .members
            .remove(member)
            .map_err(|_| ChatError::MemberNotFound {
                channel: self.id().clone(),
                member: member.clone(),
            })
    }

    pub async fn members(&self) -> ChatResult<Vec<Principal>> {
        let state = self.state.read().await;
        state.ensure_open(self.id())?;
        Ok(state.members.list())
    }

    pub async fn message_count(&self) -> ChatResult<usize> {
        let state = self.state.read().await;
        state.ensure_open(self.id())?;
        Ok(state.log.len())
    }

    pub async fn is_closed(&self) -> bool {
        self.state.read().await.closed
    }

    /// Tear down log and membership; later operations report `ChannelNotFound`
    pub(crate) async fn close(&self) {
        let mut state = self.state.write().await;
        let dropped = state.log.len();
        state.closed = true;
        state.log.clear();
        state.members.clear();
        debug!(channel_id = %self.id(), dropped_messages = dropped, "Channel closed");
    }
}
