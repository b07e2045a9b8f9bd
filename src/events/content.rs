//! Content payloads of the event types the store derives state from.
//!
//! Every parser here is tolerant: remote peers may send non-conformant
//! content, and a bad payload must degrade the room view rather than fail the
//! fold.

use crate::types::{Membership, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Content of an `m.room.member` event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberContent {
    pub membership: Membership,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl MemberContent {
    /// Extract membership content field by field.
    ///
    /// A missing or non-string `membership` reads as leave; non-string
    /// optional fields read as absent.
    pub fn from_content(content: &Value) -> Self {
        let membership = content
            .get("membership")
            .and_then(Value::as_str)
            .map(Membership::parse)
            .unwrap_or_default();

        let text = |key: &str| content.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            membership,
            displayname: text("displayname"),
            avatar_url: text("avatar_url"),
        }
    }
}

/// Content of an `m.room.power_levels` event, reduced to the user levels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerLevelsContent {
    #[serde(default)]
    pub users: BTreeMap<UserId, i64>,
    #[serde(default)]
    pub users_default: i64,
}

impl PowerLevelsContent {
    /// Read power-levels content field by field.
    ///
    /// `users_default` falls back to 0 unless it is an integer. Entries of
    /// `users` that are not integers are skipped; the rest are kept.
    pub fn from_content(content: &Value) -> Self {
        let users_default = content
            .get("users_default")
            .and_then(as_level)
            .unwrap_or_default();

        let mut users = BTreeMap::new();
        if let Some(entries) = content.get("users").and_then(Value::as_object) {
            for (user_id, level) in entries {
                match as_level(level) {
                    Some(level) => {
                        users.insert(UserId::from(user_id.as_str()), level);
                    }
                    None => warn!(user_id = %user_id, %level, "skipping non-integer power level"),
                }
            }
        }

        Self {
            users,
            users_default,
        }
    }
}

/// Integer level, accepting integral floats such as `100.0`.
fn as_level(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Content of an `m.typing` signal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingContent {
    pub user_ids: Vec<UserId>,
}

impl TypingContent {
    /// Parse typing content. Returns `None` unless `user_ids` is a list of
    /// strings.
    pub fn from_content(content: &Value) -> Option<Self> {
        serde_json::from_value(content.clone()).ok()
    }
}
