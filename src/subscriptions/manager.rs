//! Subscription manager for broadcasting room state notifications.

use crate::types::UserId;
use crossbeam_channel::{bounded, Sender, TrySendError};
use std::collections::HashMap;
use tracing::debug;

use super::types::{
    DropReason, RoomStateEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    filter: SubscriptionFilter,
    sender: Sender<RoomStateEvent>,
}

impl Subscription {
    /// Try to send a notification. `Err` carries why the subscriber must go.
    fn try_send(&self, event: RoomStateEvent) -> Result<(), DropReason> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DropReason::BufferOverflow),
            Err(TrySendError::Disconnected(_)) => Err(DropReason::Disconnected),
        }
    }

    fn matches(&self, event: &RoomStateEvent) -> bool {
        let filter = &self.filter;
        match event {
            RoomStateEvent::StateEvent { event_type, .. } => {
                filter.include_state
                    && filter
                        .event_types
                        .as_ref()
                        .map_or(true, |types| types.iter().any(|t| t == event_type))
            }
            RoomStateEvent::NewMember { .. }
            | RoomStateEvent::MemberUpdated { .. }
            | RoomStateEvent::PowerLevelsChanged { .. } => filter.include_members,
            RoomStateEvent::Typing { .. } => filter.include_typing,
            RoomStateEvent::Dropped { .. } => true,
        }
    }
}

/// Owns the subscribers of one room state store.
///
/// Mutation goes through `&mut self`, like the store that owns it.
pub struct SubscriptionManager {
    subscriptions: HashMap<SubscriptionId, Subscription>,
    next_id: u64,
    default_buffer: usize,
}

impl SubscriptionManager {
    /// Create a manager whose subscriptions buffer `default_buffer`
    /// notifications unless configured otherwise.
    pub fn new(default_buffer: usize) -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
            default_buffer,
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&mut self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = bounded(config.buffer_size.unwrap_or(self.default_buffer));
        self.subscriptions.insert(
            id,
            Subscription {
                filter: config.filter,
                sender,
            },
        );

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        if let Some(sub) = self.subscriptions.remove(&id) {
            // Best effort; the buffer may be full
            let _ = sub.sender.try_send(RoomStateEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    // --- Broadcasting ---

    pub fn broadcast_state_event(&mut self, event_type: &str, state_key: &str) {
        self.broadcast(RoomStateEvent::StateEvent {
            event_type: event_type.to_string(),
            state_key: state_key.to_string(),
        });
    }

    pub fn broadcast_new_member(&mut self, user_id: &UserId) {
        self.broadcast(RoomStateEvent::NewMember {
            user_id: user_id.clone(),
        });
    }

    pub fn broadcast_member_updated(&mut self, user_id: &UserId) {
        self.broadcast(RoomStateEvent::MemberUpdated {
            user_id: user_id.clone(),
        });
    }

    pub fn broadcast_power_levels_changed(&mut self, user_ids: Vec<UserId>) {
        self.broadcast(RoomStateEvent::PowerLevelsChanged { user_ids });
    }

    pub fn broadcast_typing(&mut self, user_ids: Vec<UserId>) {
        self.broadcast(RoomStateEvent::Typing { user_ids });
    }

    /// Send to every matching subscriber. Drops subscribers that fail to
    /// receive.
    fn broadcast(&mut self, event: RoomStateEvent) {
        if self.subscriptions.is_empty() {
            return;
        }

        let mut to_remove = Vec::new();
        for (id, sub) in &self.subscriptions {
            if sub.matches(&event) {
                if let Err(reason) = sub.try_send(event.clone()) {
                    to_remove.push((*id, reason));
                }
            }
        }

        for (id, reason) in to_remove {
            if let Some(sub) = self.subscriptions.remove(&id) {
                debug!(subscription = id.0, ?reason, "dropping subscriber");
                // Might fail, that's ok
                let _ = sub.sender.try_send(RoomStateEvent::Dropped { reason });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_receive() {
        let mut manager = SubscriptionManager::new(16);
        let handle = manager.subscribe(SubscriptionConfig::default());

        manager.broadcast_new_member(&UserId::from("@a:x"));

        assert_eq!(
            handle.try_recv().unwrap(),
            RoomStateEvent::NewMember {
                user_id: UserId::from("@a:x")
            }
        );
    }

    #[test]
    fn test_filter_by_event_type() {
        let mut manager = SubscriptionManager::new(16);
        let handle = manager.subscribe(SubscriptionConfig::with_filter(
            SubscriptionFilter::event_types(vec!["m.room.topic".to_string()]),
        ));

        manager.broadcast_state_event("m.room.name", "");
        manager.broadcast_state_event("m.room.topic", "");
        manager.broadcast_typing(vec![]);

        let received = handle.drain();
        assert_eq!(received.len(), 1);
        assert!(matches!(
            &received[0],
            RoomStateEvent::StateEvent { event_type, .. } if event_type == "m.room.topic"
        ));
    }

    #[test]
    fn test_slow_subscriber_dropped() {
        let mut manager = SubscriptionManager::new(16);
        let _handle = manager.subscribe(SubscriptionConfig::default().buffer_size(2));

        for i in 0..5 {
            manager.broadcast_member_updated(&UserId::new(format!("@u{}:x", i)));
        }

        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_power_levels_change_is_one_notification() {
        let mut manager = SubscriptionManager::new(1);
        let members = manager.subscribe(SubscriptionConfig::with_filter(SubscriptionFilter::members()));
        let typing = manager.subscribe(SubscriptionConfig::with_filter(SubscriptionFilter::typing()));

        let user_ids: Vec<UserId> = (0..10).map(|i| UserId::new(format!("@u{}:x", i))).collect();
        manager.broadcast_power_levels_changed(user_ids.clone());

        assert_eq!(manager.subscription_count(), 2);
        assert_eq!(
            members.try_recv().unwrap(),
            RoomStateEvent::PowerLevelsChanged { user_ids }
        );
        assert!(typing.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_subscriber_dropped() {
        let mut manager = SubscriptionManager::new(16);
        let handle = manager.subscribe(SubscriptionConfig::default());
        drop(handle);

        manager.broadcast_typing(vec![UserId::from("@a:x")]);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut manager = SubscriptionManager::new(16);
        let handle = manager.subscribe(SubscriptionConfig::default());
        manager.unsubscribe(handle.id);

        assert_eq!(manager.subscription_count(), 0);
        assert_eq!(
            handle.try_recv().unwrap(),
            RoomStateEvent::Dropped {
                reason: DropReason::Unsubscribed
            }
        );
    }
}
