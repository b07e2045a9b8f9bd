//! Two-level index of current state events.

use crate::events::RoomEvent;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Index mapping event type, then state key, to the current event.
#[derive(Clone, Debug)]
pub struct StateEventIndex<E> {
    /// event type -> state key -> event.
    slots: HashMap<String, HashMap<String, E>>,
}

impl<E> Default for StateEventIndex<E> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<E: RoomEvent> StateEventIndex<E> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `event` into its slot, replacing any prior occupant.
    ///
    /// Returns `None` for events without a state key; they have no slot.
    pub fn insert(&mut self, event: E) -> Option<&E> {
        let state_key = event.state_key()?.to_string();
        let by_key = self
            .slots
            .entry(event.event_type().to_string())
            .or_default();

        let stored = match by_key.entry(state_key) {
            Entry::Occupied(mut slot) => {
                slot.insert(event);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(event),
        };
        Some(stored)
    }

    /// The event in slot (`event_type`, `state_key`), if any.
    pub fn get(&self, event_type: &str, state_key: &str) -> Option<&E> {
        self.slots.get(event_type)?.get(state_key)
    }

    /// Every current event of `event_type`, in no particular order.
    pub fn get_all(&self, event_type: &str) -> Vec<&E> {
        self.slots
            .get(event_type)
            .map(|by_key| by_key.values().collect())
            .unwrap_or_default()
    }

    /// Iterate over (state key, event) pairs of `event_type`.
    pub fn iter_type<'a>(&'a self, event_type: &str) -> impl Iterator<Item = (&'a str, &'a E)> + 'a {
        self.slots
            .get(event_type)
            .into_iter()
            .flat_map(|by_key| by_key.iter().map(|(k, e)| (k.as_str(), e)))
    }

    /// Number of distinct event types with at least one slot.
    pub fn type_count(&self) -> usize {
        self.slots.len()
    }

    /// Total number of occupied slots.
    pub fn slot_count(&self) -> usize {
        self.slots.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use serde_json::json;

    fn topic(text: &str) -> Event {
        Event::state("!r:x", "m.room.topic", "", json!({"topic": text}))
    }

    #[test]
    fn test_insert_overwrites_slot() {
        let mut index = StateEventIndex::new();
        index.insert(topic("first"));
        index.insert(topic("second"));

        let current = index.get("m.room.topic", "").unwrap();
        assert_eq!(current.content["topic"], "second");
        assert_eq!(index.slot_count(), 1);
    }

    #[test]
    fn test_insert_rejects_timeline_event() {
        let mut index = StateEventIndex::new();
        let message = Event::message("!r:x", "m.room.message", json!({}));
        assert!(index.insert(message).is_none());
        assert_eq!(index.slot_count(), 0);
    }

    #[test]
    fn test_get_all_and_missing() {
        let mut index = StateEventIndex::new();
        index.insert(Event::state("!r:x", "m.room.member", "@a:x", json!({})));
        index.insert(Event::state("!r:x", "m.room.member", "@b:x", json!({})));

        assert_eq!(index.get_all("m.room.member").len(), 2);
        assert!(index.get_all("m.room.name").is_empty());
        assert!(index.get("m.room.member", "@c:x").is_none());
        assert_eq!(index.type_count(), 1);
        assert_eq!(index.iter_type("m.room.member").count(), 2);
    }
}
