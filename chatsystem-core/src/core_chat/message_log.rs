/*
    message_log.rs - Append-only, timestamp-ordered message storage

    Each channel owns exactly one log. Messages are pushed in insertion order
    and stamped by a MonotonicStamper, so the backing Vec is sorted by
    timestamp as well as by position. Queries exploit that: the `start_at`
    bound is a binary search, the author predicate a linear scan of the suffix.
*/

use super::clock::{MonotonicStamper, SharedClock};
use super::types::{MessageId, Principal, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A stored, immutable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,

    /// Position in the channel's log, starting at 0
    pub seq: u64,

    /// Who posted it; not checked against membership
    pub author: Principal,

    /// Body, stored verbatim
    pub text: String,

    /// Assigned at append time, strictly increasing within a log
    pub timestamp: Timestamp,
}

/// Predicates for [`MessageLog::query`]; every present field must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Exact author match
    pub author: Option<Principal>,

    /// Inclusive lower bound on `timestamp`
    pub start_at: Option<Timestamp>,
}

impl MessageFilter {
    /// Filter that matches every message
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author(mut self, author: impl Into<Principal>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn starting_at(mut self, start_at: Timestamp) -> Self {
        self.start_at = Some(start_at);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.author.is_none() && self.start_at.is_none()
    }

    /// Whether a single message satisfies every present predicate
    pub fn matches(&self, message: &Message) -> bool {
        let author_ok = self
            .author
            .as_ref()
            .map_or(true, |author| &message.author == author);
        let time_ok = self
            .start_at
            .map_or(true, |start_at| message.timestamp >= start_at);
        author_ok && time_ok
    }
}

/// Ordered message storage for one channel
#[derive(Debug)]
pub struct MessageLog {
    messages: Vec<Message>,
    stamper: MonotonicStamper,
}

impl MessageLog {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            messages: Vec::new(),
            stamper: MonotonicStamper::new(clock),
        }
    }

    /// Stamp and store a message, returning the stored copy
    pub fn append(&mut self, author: Principal, text: String) -> Message {
        let message = Message {
            id: MessageId::generate(),
            seq: self.messages.len() as u64,
            author,
            text,
            timestamp: self.stamper.stamp(),
        };
        trace!(seq = message.seq, timestamp = %message.timestamp, "Appended message");
        self.messages.push(message.clone());
        message
    }

    /// Messages matching `filter`, in insertion order
    pub fn query(&self, filter: &MessageFilter) -> Vec<Message> {
        let from = match filter.start_at {
            Some(start_at) => self.messages.partition_point(|m| m.timestamp < start_at),
            None => 0,
        };

        let suffix = &self.messages[from..];
        match &filter.author {
            Some(author) => suffix
                .iter()
                .filter(|m| &m.author == author)
                .cloned()
                .collect(),
            None => suffix.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.messages.last().map(|m| m.timestamp)
    }

    /// Drop every message; used by the channel delete cascade
    pub(crate) fn clear(&mut self) {
        self.messages.clear();
        self.messages.shrink_to_fit();
    }
}
