//! Power level projection.

use super::MemberRecord;
use crate::events::{PowerLevelsContent, RoomEvent};
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// How `power_level_norm` treats levels outside `[0, max_level]`.
///
/// Only reachable with negative levels, which the protocol does not forbid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormPolicy {
    /// Clamp the norm into `[0, 100]`.
    #[default]
    Clamp,

    /// Report the raw ratio, negative values included.
    Propagate,
}

/// User levels of a power-levels event, with the room-wide maximum.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerLevels {
    content: PowerLevelsContent,
    max_level: i64,
}

impl PowerLevels {
    pub fn from_content(content: PowerLevelsContent) -> Self {
        let max_level = content
            .users
            .values()
            .copied()
            .fold(content.users_default, i64::max);

        Self { content, max_level }
    }

    /// Read the levels of a power-levels event. Malformed entries are
    /// skipped, well-formed ones still apply.
    pub fn from_event<E: RoomEvent + ?Sized>(event: &E) -> Self {
        Self::from_content(PowerLevelsContent::from_content(event.content()))
    }

    pub fn users_default(&self) -> i64 {
        self.content.users_default
    }

    /// Highest level in the room: `users_default` or any explicit user level.
    pub fn max_level(&self) -> i64 {
        self.max_level
    }

    /// Level of `user_id`: its explicit entry, else `users_default`.
    pub fn level_for(&self, user_id: &UserId) -> i64 {
        self.content
            .users
            .get(user_id)
            .copied()
            .unwrap_or(self.content.users_default)
    }

    /// `level` as a percentage of the room maximum. Zero when the maximum is
    /// not positive.
    pub fn norm_for(&self, level: i64, policy: NormPolicy) -> f64 {
        if self.max_level <= 0 {
            return 0.0;
        }

        let norm = (level as f64 * 100.0) / self.max_level as f64;
        match policy {
            NormPolicy::Clamp => norm.clamp(0.0, 100.0),
            NormPolicy::Propagate => norm,
        }
    }

    /// Overwrite the power metrics of `member`.
    pub fn project(&self, member: &mut MemberRecord, policy: NormPolicy) {
        member.power_level = self.level_for(&member.user_id);
        member.power_level_norm = self.norm_for(member.power_level, policy);
    }
}

/// Project a power-levels event onto one member.
pub fn project<E: RoomEvent + ?Sized>(event: &E, member: &mut MemberRecord, policy: NormPolicy) {
    PowerLevels::from_event(event).project(member, policy);
}
