//! Typing signal projection.

use super::MemberRecord;
use crate::events::TypingContent;
use crate::types::UserId;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Result of applying a typing signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypingOutcome {
    /// The typing set was replaced. `typing` lists known members now typing,
    /// `unknown` the listed ids with no member record.
    Applied {
        typing: Vec<UserId>,
        unknown: Vec<UserId>,
    },

    /// `user_ids` was not a list of identifiers. Every member was still
    /// reset to not typing.
    Malformed,

    /// The signal belongs to another room and was ignored.
    ForeignRoom,
}

impl TypingOutcome {
    /// Known members marked as typing by this signal.
    pub fn typing(&self) -> &[UserId] {
        match self {
            TypingOutcome::Applied { typing, .. } => typing,
            _ => &[],
        }
    }
}

/// Replace the typing set of `members` with the users named in `content`.
///
/// Every member is reset first; a malformed list stops right after the reset.
pub fn apply_typing(members: &mut HashMap<UserId, MemberRecord>, content: &Value) -> TypingOutcome {
    for member in members.values_mut() {
        member.typing = false;
    }

    let Some(content) = TypingContent::from_content(content) else {
        warn!("typing signal without a user_ids list, typing set cleared");
        return TypingOutcome::Malformed;
    };

    let mut typing = Vec::new();
    let mut unknown = Vec::new();

    for user_id in content.user_ids {
        match members.get_mut(&user_id) {
            Some(member) if !member.typing => {
                member.typing = true;
                typing.push(user_id);
            }
            // Duplicate
            Some(_) => {}
            None => {
                trace!(user_id = %user_id, "typing signal names unknown user");
                unknown.push(user_id);
            }
        }
    }

    TypingOutcome::Applied { typing, unknown }
}
