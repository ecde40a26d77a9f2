// Broadcast hub: live subscriber registry and per-connection push loop

pub mod hub;
pub mod manager;
pub mod protocol;

pub use hub::{BroadcastHub, Subscriber, SubscriberGuard};
pub use manager::ConnectionManager;
pub use protocol::UpdateMessage;
