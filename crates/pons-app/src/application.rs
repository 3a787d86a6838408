//! The `Application` trait — port-multiplexed user code attached to a node.
//!
//! An application registers a `service` port and the owning router
//! dispatches any delivered message whose `dst_service` matches straight
//! to it. `tick` defaults to a no-op so most applications only need to
//! implement message handling.

use pons_core::SimTime;
use pons_message::Message;

use crate::context::AppContext;

/// User code attached to one node's router at a fixed service port.
pub trait Application: Send {
    /// The port this application listens on. `Router` dispatches delivered
    /// messages whose `dst_service` matches here.
    fn service(&self) -> u16;

    /// Called when a message addressed to this node and this service has
    /// just been delivered.
    fn on_deliver(&mut self, msg: &Message, ctx: &mut AppContext);

    /// Called once per scheduler resume of this application's own task
    /// (e.g. a ping timer). Default: does nothing — most applications are
    /// purely reactive.
    fn tick(&mut self, _now: SimTime, _ctx: &mut AppContext) {}
}
