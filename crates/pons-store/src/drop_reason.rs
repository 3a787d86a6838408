//! Why a message left a [`crate::MessageStore`].

/// Recorded in the event log whenever a message leaves a store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropReason {
    /// `now > created + ttl` at sweep time.
    Expired,
    /// Evicted by `make_room_for` to fit an incoming message.
    Evicted,
    /// Reached its destination and was handed to an application.
    Delivered,
    /// Removed by router policy after a successful handoff (e.g. direct
    /// delivery, first-contact, or spray-and-wait's last-copy transfer).
    PolicyHandoff,
}
