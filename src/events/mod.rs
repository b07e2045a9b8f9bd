//! Event accessor contract and protocol content shapes.
//!
//! The store never inspects an event beyond the [`RoomEvent`] trait. [`Event`]
//! is a plain owned implementation that deserializes from the client JSON
//! shape, convenient for hosts that do not bring their own event type.

mod content;
mod event;

pub use content::{MemberContent, PowerLevelsContent, TypingContent};
pub use event::{Event, RoomEvent};
