//! Member records.

use crate::events::MemberContent;
use crate::types::{Membership, UserId};
use serde::{Deserialize, Serialize};

/// Derived view of one user in the room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub user_id: UserId,

    /// Name to show for this user, as computed by the display name resolver.
    pub display_name: String,

    /// `displayname` from the membership content, unprocessed.
    pub raw_display_name: Option<String>,

    pub membership: Membership,

    /// Ephemeral; replaced by every typing signal.
    pub typing: bool,

    pub power_level: i64,

    /// Power level as a percentage of the highest level in the room.
    pub power_level_norm: f64,
}

impl MemberRecord {
    /// Create a record with default power metrics and no membership content.
    pub fn new(user_id: UserId) -> Self {
        Self {
            display_name: user_id.0.clone(),
            user_id,
            raw_display_name: None,
            membership: Membership::default(),
            typing: false,
            power_level: 0,
            power_level_norm: 0.0,
        }
    }

    /// Refresh membership-derived fields. Power metrics and typing are left
    /// for their own projectors.
    pub fn apply_membership(&mut self, content: MemberContent, display_name: String) {
        self.membership = content.membership;
        self.raw_display_name = content.displayname;
        self.display_name = display_name;
    }
}
