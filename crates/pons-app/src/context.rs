//! `AppContext` — what an [`crate::Application`] is handed to originate new
//! traffic.
//!
//! An application never touches the scheduler, the router, or another
//! node's state directly (same no-back-pointer discipline as `pons-node`/
//! `pons-router`): it queues [`OutgoingMessage`]s here, and the facade
//! (`pons-sim`) drains them after each callback, turning each into a
//! properly addressed [`Message`] via the owning router's `prepare_outgoing`
//! and scan/store path — the same path a message generator uses.

use pons_core::{NodeId, SimTime};
use pons_message::Payload;

/// One message an application asked to send, not yet assigned an id or
/// turned into a full [`pons_message::Message`].
#[derive(Clone, Debug)]
pub struct OutgoingMessage {
    pub dst: NodeId,
    pub dst_service: u16,
    pub payload: Payload,
    pub ttl: f64,
}

/// Handed to [`crate::Application`] callbacks: read-only identity/time plus
/// a queue of messages to originate.
pub struct AppContext {
    node_id: NodeId,
    src_service: u16,
    now: SimTime,
    outgoing: Vec<OutgoingMessage>,
}

impl AppContext {
    pub fn new(node_id: NodeId, src_service: u16, now: SimTime) -> Self {
        AppContext {
            node_id,
            src_service,
            now,
            outgoing: Vec::new(),
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn src_service(&self) -> u16 {
        self.src_service
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Queue a new outgoing message addressed to `dst`'s `dst_service` port.
    pub fn send(&mut self, dst: NodeId, dst_service: u16, payload: Payload, ttl: f64) {
        self.outgoing.push(OutgoingMessage { dst, dst_service, payload, ttl });
    }

    /// Drain every message queued since the last drain — called by the
    /// facade after each `Application` callback returns.
    pub fn drain_outgoing(&mut self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut self.outgoing)
    }
}
