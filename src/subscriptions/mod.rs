//! Subscription system for room state change notifications.
//!
//! Subscribers receive notifications over bounded channels:
//! - State slot updates
//! - Member record creation and updates
//! - Typing set replacements
//!
//! A subscriber whose buffer fills up is dropped; the fold never blocks.
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig::with_filter(SubscriptionFilter::members()));
//!
//! store.set_state_events(events);
//!
//! for event in handle.drain() {
//!     match event {
//!         RoomStateEvent::NewMember { user_id } => println!("joined: {}", user_id),
//!         RoomStateEvent::Dropped { .. } => break,
//!         _ => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, RoomStateEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
