//! Subscription types for room state change notifications.

use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered notifications before the subscriber is dropped.
    /// `None` uses the store's configured default.
    pub buffer_size: Option<usize>,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: None,
            filter: SubscriptionFilter::all(),
        }
    }
}

impl SubscriptionConfig {
    pub fn with_filter(filter: SubscriptionFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Restrict state notifications to these event types (None = all).
    pub event_types: Option<Vec<String>>,

    /// Include state slot updates.
    pub include_state: bool,

    /// Include member record creation and updates.
    pub include_members: bool,

    /// Include typing set replacements.
    pub include_typing: bool,
}

impl SubscriptionFilter {
    /// State slot updates for specific event types.
    pub fn event_types(types: Vec<String>) -> Self {
        Self {
            event_types: Some(types),
            include_state: true,
            ..Default::default()
        }
    }

    /// Member record changes.
    pub fn members() -> Self {
        Self {
            include_members: true,
            ..Default::default()
        }
    }

    /// Typing set replacements.
    pub fn typing() -> Self {
        Self {
            include_typing: true,
            ..Default::default()
        }
    }

    /// Everything.
    pub fn all() -> Self {
        Self {
            event_types: None,
            include_state: true,
            include_members: true,
            include_typing: true,
        }
    }
}

/// Notifications emitted by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomStateEvent {
    /// A state slot now holds a new event.
    StateEvent {
        event_type: String,
        state_key: String,
    },

    /// A member record was created.
    NewMember { user_id: UserId },

    /// A member record changed its membership or name.
    MemberUpdated { user_id: UserId },

    /// A power-levels fold changed the power metrics of these members.
    PowerLevelsChanged { user_ids: Vec<UserId> },

    /// The typing set was replaced.
    Typing { user_ids: Vec<UserId> },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to receive notifications.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive notifications.
    pub receiver: crossbeam_channel::Receiver<RoomStateEvent>,
}

impl SubscriptionHandle {
    /// Receive the next notification (blocking).
    pub fn recv(&self) -> Result<RoomStateEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a notification (non-blocking).
    pub fn try_recv(&self) -> Result<RoomStateEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every notification buffered so far.
    pub fn drain(&self) -> Vec<RoomStateEvent> {
        self.receiver.try_iter().collect()
    }
}
