//! The `Message` record — a bundle in flight through the network.
//!
//! The payload is a reference-counted byte slice rather than a `Vec<u8>`:
//! fanning a message out to several peers only needs independent per-copy
//! *header* state (addressing, hop count, metadata) — the payload bytes
//! are immutable once created and can be shared across every copy.

use std::sync::Arc;

use pons_core::{NodeId, SimTime};

use crate::metadata::MessageMetadata;

/// Shared, immutable message payload. Cloning a [`Message`] is O(1): the
/// `Arc` is bumped, not the bytes.
pub type Payload = Arc<[u8]>;

/// A message in flight: a header plus an immutable, shared payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Human-assigned tag, not guaranteed unique on its own — see [`Message::unique_id`].
    pub id: String,
    pub src: NodeId,
    pub dst: NodeId,
    pub src_service: u16,
    pub dst_service: u16,
    /// Payload size in bytes. Immutable after construction.
    size: u64,
    pub created: SimTime,
    /// Time to live, in seconds, from `created`.
    pub ttl: f64,
    pub hops: u32,
    pub payload: Payload,
    pub metadata: MessageMetadata,
}

impl Message {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        src: NodeId,
        dst: NodeId,
        src_service: u16,
        dst_service: u16,
        payload: Payload,
        created: SimTime,
        ttl: f64,
        metadata: MessageMetadata,
    ) -> Self {
        let size = payload.len() as u64;
        Message {
            id: id.into(),
            src,
            dst,
            src_service,
            dst_service,
            size,
            created,
            ttl,
            hops: 0,
            payload,
            metadata,
        }
    }

    /// Payload size in bytes, fixed at construction time.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// A key stable across every clone of this message, used to key router
    /// `history` tables and event-log correlation. Built from the *creation*
    /// source and time, not the current hop count or destination.
    pub fn unique_id(&self) -> String {
        format!("{}-{}-{:.6}", self.id, self.src.0, self.created.as_secs())
    }

    /// `true` once `now` has passed this message's deadline. Strictly
    /// greater-than: a message expires the instant *after* `created + ttl`,
    /// not at it.
    #[inline]
    pub fn is_expired(&self, now: SimTime) -> bool {
        now.as_secs() > self.created.as_secs() + self.ttl
    }

    /// Record one more hop. Hops only ever increase.
    #[inline]
    pub fn bump_hops(&mut self) {
        self.hops += 1;
    }

    /// `true` when this message has reached its addressed destination.
    #[inline]
    pub fn is_delivered_at(&self, node: NodeId) -> bool {
        self.dst == node
    }
}
