//! `PingApp` — an example application demonstrating the `Application` trait.
//!
//! Sends a periodic ping to a configured target and answers any incoming
//! ping with a pong on the sender's own service port, used as the harness
//! smoke-test application in `demos/`.

use std::sync::Arc;

use pons_core::{NodeId, SimTime};
use pons_message::Message;

use crate::application::Application;
use crate::context::AppContext;

const PING_PAYLOAD: &[u8] = b"ping";
const PONG_PAYLOAD: &[u8] = b"pong";

/// A trivial request/response application: pings `target` every `interval`
/// seconds and echoes a pong back to whoever pings it.
pub struct PingApp {
    service: u16,
    target: NodeId,
    interval: f64,
    ttl: f64,
    next_due: f64,
    pub pings_sent: u32,
    pub pongs_received: u32,
    pub pings_answered: u32,
}

impl PingApp {
    pub fn new(service: u16, target: NodeId, interval: f64, ttl: f64) -> Self {
        PingApp {
            service,
            target,
            interval,
            ttl,
            next_due: 0.0,
            pings_sent: 0,
            pongs_received: 0,
            pings_answered: 0,
        }
    }
}

impl Application for PingApp {
    fn service(&self) -> u16 {
        self.service
    }

    fn on_deliver(&mut self, msg: &Message, ctx: &mut AppContext) {
        if msg.payload.as_ref() == PING_PAYLOAD {
            self.pings_answered += 1;
            ctx.send(msg.src, msg.src_service, Arc::from(PONG_PAYLOAD), self.ttl);
        } else if msg.payload.as_ref() == PONG_PAYLOAD {
            self.pongs_received += 1;
        }
    }

    fn tick(&mut self, now: SimTime, ctx: &mut AppContext) {
        if now.as_secs() + f64::EPSILON >= self.next_due {
            ctx.send(self.target, self.service, Arc::from(PING_PAYLOAD), self.ttl);
            self.pings_sent += 1;
            self.next_due = now.as_secs() + self.interval;
        }
    }
}
