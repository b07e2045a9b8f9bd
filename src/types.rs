//! Core types for the room state store.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Event type of membership state events.
pub const MEMBER_EVENT_TYPE: &str = "m.room.member";

/// Event type of power-levels state events.
pub const POWER_LEVELS_EVENT_TYPE: &str = "m.room.power_levels";

/// Event type of ephemeral typing signals.
pub const TYPING_EVENT_TYPE: &str = "m.typing";

/// Identifier of a room (e.g. `!abc:example.org`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoomId({})", self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        RoomId(s.to_string())
    }
}

/// Identifier of a user (e.g. `@alice:example.org`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Membership state of a user in a room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "String", from = "String")]
pub enum Membership {
    Join,
    Invite,
    #[default]
    Leave,
    Ban,
    Knock,
    /// Any value this crate does not recognise, kept verbatim.
    Other(String),
}

impl Membership {
    pub fn parse(value: &str) -> Self {
        match value {
            "join" => Membership::Join,
            "invite" => Membership::Invite,
            "leave" => Membership::Leave,
            "ban" => Membership::Ban,
            "knock" => Membership::Knock,
            other => Membership::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Membership::Join => "join",
            Membership::Invite => "invite",
            Membership::Leave => "leave",
            Membership::Ban => "ban",
            Membership::Knock => "knock",
            Membership::Other(s) => s,
        }
    }

    /// Joined or invited members take part in display name disambiguation.
    pub fn is_present(&self) -> bool {
        matches!(self, Membership::Join | Membership::Invite)
    }
}

impl From<String> for Membership {
    fn from(s: String) -> Self {
        Membership::parse(&s)
    }
}

impl From<Membership> for String {
    fn from(m: Membership) -> Self {
        m.as_str().to_string()
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room state statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateStats {
    pub member_count: usize,
    pub joined_count: usize,
    pub invited_count: usize,
    pub typing_count: usize,
    pub state_type_count: usize,
    pub state_slot_count: usize,
}
