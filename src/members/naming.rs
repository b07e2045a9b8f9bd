//! Display name derivation.

use crate::events::{MemberContent, RoomEvent};
use crate::state::StateEventIndex;
use crate::types::{UserId, MEMBER_EVENT_TYPE};

/// Derives the display name of a member from its membership event and the
/// current room state.
///
/// The state passed in already contains `event`.
pub trait DisplayNameResolver<E> {
    fn display_name(&self, event: &E, state: &StateEventIndex<E>) -> String;
}

impl<E, F> DisplayNameResolver<E> for F
where
    F: Fn(&E, &StateEventIndex<E>) -> String,
{
    fn display_name(&self, event: &E, state: &StateEventIndex<E>) -> String {
        self(event, state)
    }
}

/// Protocol display name rules.
///
/// Uses the `displayname` of the membership content, falling back to the
/// user id. When another joined or invited member shares the name, the user
/// id is appended to tell them apart.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemberNameResolver;

impl<E: RoomEvent> DisplayNameResolver<E> for MemberNameResolver {
    fn display_name(&self, event: &E, state: &StateEventIndex<E>) -> String {
        let user_id = event.state_key().unwrap_or_default();
        let content = MemberContent::from_content(event.content());

        let name = match content.displayname {
            Some(name) if !name.trim().is_empty() => name,
            _ => return user_id.to_string(),
        };

        let ambiguous = user_ids_with_display_name(state, &name)
            .iter()
            .any(|other| other.as_str() != user_id);

        if ambiguous {
            format!("{} ({})", name, user_id)
        } else {
            name
        }
    }
}

/// Users whose joined or invited membership carries `display_name`.
pub fn user_ids_with_display_name<E: RoomEvent>(
    state: &StateEventIndex<E>,
    display_name: &str,
) -> Vec<UserId> {
    state
        .iter_type(MEMBER_EVENT_TYPE)
        .filter(|(_, event)| {
            let content = MemberContent::from_content(event.content());
            content.membership.is_present() && content.displayname.as_deref() == Some(display_name)
        })
        .map(|(user_id, _)| UserId::from(user_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use serde_json::json;

    fn member(user_id: &str, content: serde_json::Value) -> Event {
        Event::state("!r:x", "m.room.member", user_id, content)
    }

    fn resolve(state: &mut StateEventIndex<Event>, event: Event) -> String {
        let stored = state.insert(event).unwrap().clone();
        MemberNameResolver.display_name(&stored, state)
    }

    #[test]
    fn test_uses_displayname() {
        let mut state = StateEventIndex::new();
        let name = resolve(
            &mut state,
            member("@a:x", json!({"membership": "join", "displayname": "Alice"})),
        );
        assert_eq!(name, "Alice");
    }

    #[test]
    fn test_falls_back_to_user_id() {
        let mut state = StateEventIndex::new();
        let name = resolve(&mut state, member("@a:x", json!({"membership": "join"})));
        assert_eq!(name, "@a:x");

        let blank = resolve(
            &mut state,
            member("@b:x", json!({"membership": "join", "displayname": "  "})),
        );
        assert_eq!(blank, "@b:x");
    }

    #[test]
    fn test_disambiguates_shared_name() {
        let mut state = StateEventIndex::new();
        resolve(
            &mut state,
            member("@a:x", json!({"membership": "join", "displayname": "Sam"})),
        );
        let name = resolve(
            &mut state,
            member("@b:x", json!({"membership": "invite", "displayname": "Sam"})),
        );
        assert_eq!(name, "Sam (@b:x)");
    }

    #[test]
    fn test_departed_members_do_not_clash() {
        let mut state = StateEventIndex::new();
        resolve(
            &mut state,
            member("@a:x", json!({"membership": "leave", "displayname": "Sam"})),
        );
        let name = resolve(
            &mut state,
            member("@b:x", json!({"membership": "join", "displayname": "Sam"})),
        );
        assert_eq!(name, "Sam");
    }

    #[test]
    fn test_closure_resolver() {
        let state = StateEventIndex::new();
        let event = member("@a:x", json!({"membership": "join"}));
        let resolver = |e: &Event, _: &StateEventIndex<Event>| format!("user {}", e.state_key().unwrap());
        assert_eq!(resolver.display_name(&event, &state), "user @a:x");
    }
}
