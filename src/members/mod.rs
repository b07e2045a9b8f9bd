//! Derived per-user view of the room.
//!
//! Member records are built from `m.room.member` events and refreshed by
//! power-levels events and typing signals. They are never removed: a user who
//! leaves keeps a record with a leave membership.

mod naming;
mod power;
mod record;
mod typing;

pub use naming::{user_ids_with_display_name, DisplayNameResolver, MemberNameResolver};
pub use power::{project, NormPolicy, PowerLevels};
pub use record::MemberRecord;
pub use typing::{apply_typing, TypingOutcome};
