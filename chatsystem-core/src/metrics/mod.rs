//! Metrics for observability
//!
//! Uses the `metrics` facade. Until the embedding process installs a recorder
//! every call here is a cheap no-op.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Instant;

pub const CHANNELS_CREATED: &str = "chat.channels.created";
pub const CHANNELS_DELETED: &str = "chat.channels.deleted";
pub const CHANNELS_ACTIVE: &str = "chat.channels.active";
pub const MESSAGES_APPENDED: &str = "chat.messages.appended";
pub const MESSAGES_QUERY_DURATION: &str = "chat.messages.query.duration_ms";
pub const MEMBERS_ADDED: &str = "chat.members.added";
pub const MEMBERS_REMOVED: &str = "chat.members.removed";
pub const REQUESTS_REJECTED: &str = "chat.requests.rejected";

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(CHANNELS_CREATED, "Number of channels created");
    describe_counter!(CHANNELS_DELETED, "Number of channels deleted");
    describe_gauge!(CHANNELS_ACTIVE, "Channels currently registered");
    describe_counter!(MESSAGES_APPENDED, "Messages appended across all channels");
    describe_histogram!(MESSAGES_QUERY_DURATION, "Message query duration in milliseconds");
    describe_counter!(MEMBERS_ADDED, "Membership registrations that inserted a new member");
    describe_counter!(MEMBERS_REMOVED, "Members removed from channels");
    describe_counter!(
        REQUESTS_REJECTED,
        "Core operations that failed with NotFound or AlreadyExists"
    );
}

/// Increment counter `name` by `value`
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Set gauge `name` to `value`
pub fn record_gauge(name: &'static str, value: f64) {
    gauge!(name).set(value);
}

/// Records elapsed milliseconds into a histogram when stopped
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the duration in milliseconds
    pub fn stop(self) {
        let duration = self.start.elapsed();
        histogram!(self.name).record(duration.as_secs_f64() * 1000.0);
    }
}
