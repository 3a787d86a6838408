//! `MessageStore` — a capacity-bounded buffer of in-flight messages.
//!
//! Capacity `0` means unbounded (space eviction never runs, but TTL sweeps
//! still do); eviction sorts by `(size, created)` ascending — smallest and
//! oldest messages go first.

use pons_core::SimTime;
use pons_message::Message;

use crate::drop_reason::DropReason;

/// A per-node buffer of messages awaiting forwarding or delivery.
pub struct MessageStore {
    capacity: u64,
    used: u64,
    items: Vec<Message>,
}

impl MessageStore {
    /// `capacity == 0` means unbounded.
    pub fn new(capacity: u64) -> Self {
        MessageStore {
            capacity,
            used: 0,
            items: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn used_bytes(&self) -> u64 {
        self.used
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.items.iter()
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.items.iter().any(|m| m.unique_id() == unique_id)
    }

    pub fn get(&self, unique_id: &str) -> Option<&Message> {
        self.items.iter().find(|m| m.unique_id() == unique_id)
    }

    /// Mutable access to a stored message, e.g. for a forwarding policy to
    /// shrink spray-and-wait's remaining copy count in place.
    pub fn get_mut(&mut self, unique_id: &str) -> Option<&mut Message> {
        self.items.iter_mut().find(|m| m.unique_id() == unique_id)
    }

    /// Attempt to add `msg`. On capacity pressure, sweeps expired messages
    /// and evicts smallest-oldest-first until `msg` fits; if it still
    /// doesn't fit, the message is rejected and the store is left unchanged
    /// (besides whatever sweeping/eviction already happened).
    pub fn add(&mut self, msg: Message, now: SimTime, mut on_drop: impl FnMut(&Message, DropReason)) -> bool {
        if self.capacity > 0 && self.used + msg.size() > self.capacity {
            self.sweep_expired(now, &mut on_drop);
            self.make_room_for(&msg, &mut on_drop);
            if self.used + msg.size() > self.capacity {
                return false;
            }
        }
        self.used += msg.size();
        self.items.push(msg);
        true
    }

    /// Remove the message with the given `unique_id`, if present, invoking
    /// `on_drop` with the removed message and `reason`.
    pub fn del(&mut self, unique_id: &str, reason: DropReason, mut on_drop: impl FnMut(&Message, DropReason)) -> bool {
        if let Some(pos) = self.items.iter().position(|m| m.unique_id() == unique_id) {
            let msg = self.items.remove(pos);
            self.used -= msg.size();
            on_drop(&msg, reason);
            true
        } else {
            false
        }
    }

    /// Drop every message that has expired as of `now`.
    pub fn sweep_expired(&mut self, now: SimTime, on_drop: &mut impl FnMut(&Message, DropReason)) {
        let mut i = 0;
        while i < self.items.len() {
            if self.items[i].is_expired(now) {
                let msg = self.items.remove(i);
                self.used -= msg.size();
                on_drop(&msg, DropReason::Expired);
            } else {
                i += 1;
            }
        }
    }

    /// Evict smallest-and-oldest messages first until `incoming` would fit,
    /// or until there is nothing left to evict. A no-op if `incoming` alone
    /// could never fit within `capacity`.
    fn make_room_for(&mut self, incoming: &Message, on_drop: &mut impl FnMut(&Message, DropReason)) {
        if incoming.size() >= self.capacity {
            return;
        }
        self.items.sort_by(|a, b| (a.size(), a.created).cmp(&(b.size(), b.created)));
        while self.used + incoming.size() > self.capacity && !self.items.is_empty() {
            let evicted = self.items.remove(0);
            self.used -= evicted.size();
            on_drop(&evicted, DropReason::Evicted);
        }
    }
}
