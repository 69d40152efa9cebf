//! Subscription streams for live task updates.

pub mod hub;

pub use hub::{SubscriptionHub, UpdateItem, UpdateStream};
