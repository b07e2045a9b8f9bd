//! # Room State
//!
//! Derived, authoritative state of a single Matrix room, built by folding
//! state events delivered in order.
//!
//! ## Core Concepts
//!
//! - **State index**: one current event per (event type, state key) slot,
//!   last write wins
//! - **Members**: per-user records derived from `m.room.member` events,
//!   never removed
//! - **Power levels**: per-member level and percentage of the room maximum,
//!   recomputed whenever `m.room.power_levels` or the member changes
//! - **Typing**: ephemeral flag replaced wholesale by each `m.typing` signal
//!
//! ## Example
//!
//! ```ignore
//! use room_state::{Event, RoomStateStore};
//! use serde_json::json;
//!
//! let mut store = RoomStateStore::new("!room:example.org");
//!
//! store.set_state_events(vec![
//!     Event::state("!room:example.org", "m.room.power_levels", "", json!({
//!         "users": {"@alice:example.org": 100}
//!     })),
//!     Event::state("!room:example.org", "m.room.member", "@alice:example.org", json!({
//!         "membership": "join",
//!         "displayname": "Alice"
//!     })),
//! ]);
//!
//! store.set_typing_event(&Event::typing("!room:example.org", ["@alice:example.org"]))?;
//!
//! let alice = store.get_member("@alice:example.org").unwrap();
//! assert_eq!(alice.power_level_norm, 100.0);
//! assert!(alice.typing);
//! ```

pub mod error;
pub mod events;
pub mod members;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{Result, RoomStateError};
pub use events::{Event, MemberContent, PowerLevelsContent, RoomEvent, TypingContent};
pub use members::{
    project, DisplayNameResolver, MemberNameResolver, MemberRecord, NormPolicy, PowerLevels,
    TypingOutcome,
};
pub use state::{StateEventIndex, StateKind};
pub use store::{FoldSummary, RoomStateStore, RoomStoreConfig};
pub use subscriptions::{
    DropReason, RoomStateEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
