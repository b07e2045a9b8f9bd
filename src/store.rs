//! Main room state store tying all components together.

use crate::error::{Result, RoomStateError};
use crate::events::{Event, MemberContent, RoomEvent};
use crate::members::{
    apply_typing, user_ids_with_display_name, DisplayNameResolver, MemberNameResolver,
    MemberRecord, NormPolicy, PowerLevels, TypingOutcome,
};
use crate::state::{StateEventIndex, StateKind};
use crate::subscriptions::{SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager};
use crate::types::{
    Membership, RoomId, RoomStateStats, UserId, MEMBER_EVENT_TYPE, POWER_LEVELS_EVENT_TYPE,
    TYPING_EVENT_TYPE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

fn default_subscription_buffer() -> usize {
    256
}

/// Store configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomStoreConfig {
    /// Room whose events this store accepts.
    pub room_id: RoomId,

    /// Handling of power level norms outside `[0, 100]`.
    #[serde(default)]
    pub norm_policy: NormPolicy,

    /// Default notification buffer per subscriber.
    #[serde(default = "default_subscription_buffer")]
    pub subscription_buffer: usize,
}

impl RoomStoreConfig {
    pub fn new(room_id: impl Into<RoomId>) -> Self {
        Self {
            room_id: room_id.into(),
            norm_policy: NormPolicy::default(),
            subscription_buffer: default_subscription_buffer(),
        }
    }

    pub fn with_norm_policy(mut self, policy: NormPolicy) -> Self {
        self.norm_policy = policy;
        self
    }

    pub fn with_subscription_buffer(mut self, size: usize) -> Self {
        self.subscription_buffer = size;
        self
    }

    /// Check the configuration for values the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.room_id.as_str().is_empty() {
            return Err(RoomStateError::InvalidConfig("room_id is empty".into()));
        }
        if self.subscription_buffer == 0 {
            return Err(RoomStateError::InvalidConfig(
                "subscription_buffer must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What a batch fold did with its events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldSummary {
    /// Events written into the state index.
    pub applied: usize,
    /// Events skipped because they belong to another room.
    pub foreign_room: usize,
    /// Events skipped because they carry no state key.
    pub not_state: usize,
}

/// The current state of one room.
///
/// Folds state events into an index of current events per
/// (type, state key), and keeps member records derived from membership and
/// power-levels events consistent with that index. Typing signals only touch
/// the member records.
///
/// The store is single-owner: every mutation takes `&mut self`. Hosts that
/// receive events from several sources must serialize calls into it.
pub struct RoomStateStore<E = Event> {
    config: RoomStoreConfig,

    /// Derived member records, never removed.
    members: HashMap<UserId, MemberRecord>,

    /// Current event per (type, state key).
    state: StateEventIndex<E>,

    /// Backward pagination cursor, owned by the paginator.
    pagination_token: Option<String>,

    resolver: Box<dyn DisplayNameResolver<E>>,

    subscriptions: SubscriptionManager,
}

impl<E: RoomEvent> RoomStateStore<E> {
    /// Create an empty store for `room_id` with the default configuration.
    pub fn new(room_id: impl Into<RoomId>) -> Self {
        Self::build(RoomStoreConfig::new(room_id))
    }

    /// Create an empty store from a validated configuration.
    pub fn with_config(config: RoomStoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RoomStoreConfig) -> Self {
        Self {
            subscriptions: SubscriptionManager::new(config.subscription_buffer),
            config,
            members: HashMap::new(),
            state: StateEventIndex::new(),
            pagination_token: None,
            resolver: Box::new(MemberNameResolver),
        }
    }

    /// Replace the display name resolver used for members folded from now on.
    pub fn with_resolver(mut self, resolver: impl DisplayNameResolver<E> + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn room_id(&self) -> &RoomId {
        &self.config.room_id
    }

    pub fn config(&self) -> &RoomStoreConfig {
        &self.config
    }

    // --- Folding ---

    /// Fold a batch of events in delivery order.
    ///
    /// Events for other rooms and timeline events are skipped. Each state
    /// event overwrites its (type, state key) slot, then refreshes the
    /// member records that depend on it.
    pub fn set_state_events<I>(&mut self, events: I) -> FoldSummary
    where
        I: IntoIterator<Item = E>,
    {
        let mut summary = FoldSummary::default();

        for event in events {
            if event.room_id() != &self.config.room_id {
                debug!(
                    room_id = %self.config.room_id,
                    event_room = %event.room_id(),
                    event_type = event.event_type(),
                    "skipping event for another room"
                );
                summary.foreign_room += 1;
                continue;
            }

            if !event.is_state() || !self.fold_state_event(event) {
                summary.not_state += 1;
                continue;
            }

            summary.applied += 1;
        }

        summary
    }

    /// Write one state event and run its derived-state side effect.
    fn fold_state_event(&mut self, event: E) -> bool {
        let kind = StateKind::of(event.event_type());

        let Some(stored) = self.state.insert(event) else {
            debug!("skipping state event without a state key");
            return false;
        };

        let event_type = stored.event_type().to_string();
        let state_key = stored.state_key().unwrap_or_default().to_string();
        let power_levels = match kind {
            StateKind::PowerLevels => Some(PowerLevels::from_event(stored)),
            _ => None,
        };

        trace!(event_type = %event_type, state_key = %state_key, ?kind, "folded state event");
        self.subscriptions.broadcast_state_event(&event_type, &state_key);

        match kind {
            StateKind::Member => self.refresh_member(UserId::new(state_key)),
            StateKind::PowerLevels => {
                if let Some(levels) = power_levels {
                    self.reapply_power_levels(&levels);
                }
            }
            StateKind::Other => {}
        }

        true
    }

    /// Rebuild the record of `user_id` from its current membership event.
    fn refresh_member(&mut self, user_id: UserId) {
        let Some(event) = self.state.get(MEMBER_EVENT_TYPE, user_id.as_str()) else {
            return;
        };

        let display_name = self.resolver.display_name(event, &self.state);
        let content = MemberContent::from_content(event.content());
        let power_levels = self
            .state
            .get(POWER_LEVELS_EVENT_TYPE, "")
            .map(PowerLevels::from_event);

        let created = !self.members.contains_key(&user_id);
        let member = self
            .members
            .entry(user_id.clone())
            .or_insert_with(|| MemberRecord::new(user_id.clone()));

        member.apply_membership(content, display_name);
        if let Some(levels) = power_levels {
            levels.project(member, self.config.norm_policy);
        }

        trace!(
            user_id = %user_id,
            membership = %member.membership,
            power_level = member.power_level,
            created,
            "member refreshed"
        );

        if created {
            self.subscriptions.broadcast_new_member(&user_id);
        } else {
            self.subscriptions.broadcast_member_updated(&user_id);
        }
    }

    /// Recompute power metrics of every member; the norm depends on the
    /// room-wide maximum. Subscribers get one notification naming the
    /// members whose metrics changed.
    fn reapply_power_levels(&mut self, levels: &PowerLevels) {
        let policy = self.config.norm_policy;
        let mut changed = Vec::new();
        for member in self.members.values_mut() {
            let before = (member.power_level, member.power_level_norm);
            levels.project(member, policy);
            if before != (member.power_level, member.power_level_norm) {
                changed.push(member.user_id.clone());
            }
        }

        debug!(
            members = self.members.len(),
            changed = changed.len(),
            max_level = levels.max_level(),
            "power levels reapplied"
        );

        if !changed.is_empty() {
            changed.sort();
            self.subscriptions.broadcast_power_levels_changed(changed);
        }
    }

    /// Replace the typing set with the users named by a typing signal.
    ///
    /// Fails with [`RoomStateError::InvalidArgument`] if `event` is not an
    /// `m.typing` event; nothing is changed in that case. A malformed user
    /// list still clears the typing set and is reported as
    /// [`TypingOutcome::Malformed`].
    pub fn set_typing_event<T>(&mut self, event: &T) -> Result<TypingOutcome>
    where
        T: RoomEvent + ?Sized,
    {
        if event.event_type() != TYPING_EVENT_TYPE {
            return Err(RoomStateError::InvalidArgument {
                expected: TYPING_EVENT_TYPE.to_string(),
                got: event.event_type().to_string(),
            });
        }

        if event.room_id() != &self.config.room_id {
            debug!(
                room_id = %self.config.room_id,
                event_room = %event.room_id(),
                "skipping typing signal for another room"
            );
            return Ok(TypingOutcome::ForeignRoom);
        }

        let outcome = apply_typing(&mut self.members, event.content());
        self.subscriptions.broadcast_typing(outcome.typing().to_vec());

        Ok(outcome)
    }

    // --- Queries ---

    /// Every current state event of `event_type`, in no particular order.
    pub fn get_state_events(&self, event_type: &str) -> Vec<&E> {
        self.state.get_all(event_type)
    }

    /// The current event in slot (`event_type`, `state_key`).
    pub fn get_state_event(&self, event_type: &str, state_key: &str) -> Option<&E> {
        self.state.get(event_type, state_key)
    }

    /// Every member record, in no particular order.
    pub fn get_members(&self) -> Vec<&MemberRecord> {
        self.members.values().collect()
    }

    pub fn get_member(&self, user_id: &str) -> Option<&MemberRecord> {
        self.members.get(user_id)
    }

    /// The current `m.room.member` event of `user_id`.
    pub fn member_event(&self, user_id: &str) -> Option<&E> {
        self.state.get(MEMBER_EVENT_TYPE, user_id)
    }

    pub fn members_with_membership(&self, membership: &Membership) -> Vec<&MemberRecord> {
        self.members
            .values()
            .filter(|m| &m.membership == membership)
            .collect()
    }

    pub fn joined_member_count(&self) -> usize {
        self.count_membership(&Membership::Join)
    }

    pub fn invited_member_count(&self) -> usize {
        self.count_membership(&Membership::Invite)
    }

    fn count_membership(&self, membership: &Membership) -> usize {
        self.members
            .values()
            .filter(|m| &m.membership == membership)
            .count()
    }

    /// Joined or invited users whose raw display name is `display_name`.
    pub fn user_ids_with_display_name(&self, display_name: &str) -> Vec<UserId> {
        user_ids_with_display_name(&self.state, display_name)
    }

    /// Members currently typing.
    pub fn typing_user_ids(&self) -> Vec<&UserId> {
        self.members
            .values()
            .filter(|m| m.typing)
            .map(|m| &m.user_id)
            .collect()
    }

    pub fn stats(&self) -> RoomStateStats {
        RoomStateStats {
            member_count: self.members.len(),
            joined_count: self.joined_member_count(),
            invited_count: self.invited_member_count(),
            typing_count: self.members.values().filter(|m| m.typing).count(),
            state_type_count: self.state.type_count(),
            state_slot_count: self.state.slot_count(),
        }
    }

    // --- Pagination ---

    pub fn pagination_token(&self) -> Option<&str> {
        self.pagination_token.as_deref()
    }

    pub fn set_pagination_token(&mut self, token: Option<String>) {
        self.pagination_token = token;
    }

    // --- Subscriptions ---

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }
}
