//! Dispatch of folded state events to their derived-state side effects.

use crate::types::{MEMBER_EVENT_TYPE, POWER_LEVELS_EVENT_TYPE};

/// Recognised kinds of state event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateKind {
    /// `m.room.member`: refreshes one member record.
    Member,

    /// `m.room.power_levels`: recomputes every member's power metrics.
    PowerLevels,

    /// Any other type: index update only.
    Other,
}

impl StateKind {
    /// Classify an event type.
    pub fn of(event_type: &str) -> Self {
        match event_type {
            MEMBER_EVENT_TYPE => StateKind::Member,
            POWER_LEVELS_EVENT_TYPE => StateKind::PowerLevels,
            _ => StateKind::Other,
        }
    }
}
