//! Room events as seen by the store.

use crate::types::{RoomId, UserId, TYPING_EVENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accessor capability the store needs from an event.
///
/// Parsing and validation of the wire format belong to the caller; the store
/// only reads these fields.
pub trait RoomEvent {
    /// Room the event was sent in.
    fn room_id(&self) -> &RoomId;

    /// Event type, e.g. `m.room.member`.
    fn event_type(&self) -> &str;

    /// State key, `None` for timeline events.
    fn state_key(&self) -> Option<&str>;

    /// Structured content payload.
    fn content(&self) -> &Value;

    /// Whether the event sets a state slot.
    fn is_state(&self) -> bool {
        self.state_key().is_some()
    }
}

/// An owned room event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    pub room_id: RoomId,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,

    #[serde(default)]
    pub content: Value,
}

impl Event {
    /// Create a state event for slot (`event_type`, `state_key`).
    pub fn state(
        room_id: impl Into<RoomId>,
        event_type: impl Into<String>,
        state_key: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            event_id: None,
            room_id: room_id.into(),
            event_type: event_type.into(),
            sender: None,
            state_key: Some(state_key.into()),
            content,
        }
    }

    /// Create a timeline (non-state) event.
    pub fn message(room_id: impl Into<RoomId>, event_type: impl Into<String>, content: Value) -> Self {
        Self {
            event_id: None,
            room_id: room_id.into(),
            event_type: event_type.into(),
            sender: None,
            state_key: None,
            content,
        }
    }

    /// Create an `m.typing` signal naming the users currently typing.
    pub fn typing<I, U>(room_id: impl Into<RoomId>, user_ids: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        let ids: Vec<Value> = user_ids
            .into_iter()
            .map(|u| Value::String(u.into().0))
            .collect();

        Self::message(
            room_id,
            TYPING_EVENT_TYPE,
            serde_json::json!({ "user_ids": ids }),
        )
    }

    /// Parse an event from its JSON form.
    pub fn from_json(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_sender(mut self, sender: impl Into<UserId>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }
}

impl RoomEvent for Event {
    fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn state_key(&self) -> Option<&str> {
        self.state_key.as_deref()
    }

    fn content(&self) -> &Value {
        &self.content
    }
}

impl<E: RoomEvent + ?Sized> RoomEvent for &E {
    fn room_id(&self) -> &RoomId {
        (**self).room_id()
    }

    fn event_type(&self) -> &str {
        (**self).event_type()
    }

    fn state_key(&self) -> Option<&str> {
        (**self).state_key()
    }

    fn content(&self) -> &Value {
        (**self).content()
    }

    fn is_state(&self) -> bool {
        (**self).is_state()
    }
}
