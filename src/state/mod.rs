//! Authoritative state event index and kind dispatch.
//!
//! Each (event type, state key) slot holds exactly one event: the most
//! recently folded one. Delivery order is trusted, no timestamps are compared.

mod index;
mod operations;

pub use index::StateEventIndex;
pub use operations::StateKind;
