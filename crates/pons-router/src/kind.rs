//! `RouterKind` — the closed set of forwarding policies.
//!
//! A tagged variant rather than a `dyn Router` trait object, per the design
//! note recommending a "tagged variant or vtable-like capability set" over
//! dynamic dispatch: there are exactly six policies, known at compile time,
//! and `Router::plan_forwards`/`Router::on_tx_succeeded` switch on them
//! directly. The substrate every variant shares (history, store, peer scan)
//! stays in [`crate::core::RouterCore`], never duplicated per policy.

use std::collections::HashMap;

use pons_core::NodeId;
use pons_message::Message;

use crate::prophet::ProphetState;
use crate::static_router::StaticTable;

/// Spray-and-wait's forwarding state: how many copies a new send splits off,
/// and whether the split is binary (halving) or basic (always one copy).
#[derive(Clone, Copy, Debug)]
pub struct SprayAndWaitConfig {
    pub binary: bool,
    pub initial_copies: u32,
}

/// The six forwarding policies `pons-router` implements.
pub enum RouterKind {
    DirectDelivery,
    FirstContact,
    Epidemic,
    SprayAndWait(SprayAndWaitConfig),
    Prophet(ProphetState),
    Static(StaticTable),
}

impl RouterKind {
    /// `true` if this policy should seed an originated message's metadata
    /// with a spray-and-wait copy count before it is first stored.
    pub fn prepare_outgoing(&self, msg: &mut Message) {
        if let RouterKind::SprayAndWait(cfg) = self {
            if msg.metadata.copies.is_none() {
                msg.metadata.copies = Some(cfg.initial_copies);
            }
        }
    }

    /// Called on meeting `peer` during a scan, with the predictability
    /// table `peer` last advertised (empty for non-PRoPHET peers). A no-op
    /// for every policy but PRoPHET.
    pub fn on_peer_encounter(&mut self, peer: NodeId, now: f64, peer_table: &HashMap<NodeId, f64>) {
        if let RouterKind::Prophet(state) = self {
            state.on_peer_encounter(peer, now, peer_table);
        }
    }

    /// This router's advertised predictability table, for a peer meeting it
    /// to read — empty outside PRoPHET.
    pub fn prophet_table(&self) -> HashMap<NodeId, f64> {
        match self {
            RouterKind::Prophet(state) => state.table_snapshot(),
            _ => HashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RouterKind::DirectDelivery => "direct_delivery",
            RouterKind::FirstContact => "first_contact",
            RouterKind::Epidemic => "epidemic",
            RouterKind::SprayAndWait(_) => "spray_and_wait",
            RouterKind::Prophet(_) => "prophet",
            RouterKind::Static(_) => "static",
        }
    }
}
