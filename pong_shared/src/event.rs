//! Outbound event queue.
//!
//! The simulation never talks to the network directly. It pushes messages
//! here during a frame and the connection loop drains them afterwards, in
//! order. Nothing is acknowledged or retried.

use std::collections::VecDeque;

use crate::net::NetMsg;

#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<NetMsg>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message for the peer.
    pub fn push(&mut self, msg: NetMsg) {
        self.queue.push_back(msg);
    }

    /// Takes all queued messages, oldest first.
    pub fn drain(&mut self) -> Vec<NetMsg> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetMsg> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut out = Outbox::new();
        out.push(NetMsg::InRoom);
        out.push(NetMsg::Leave);
        assert_eq!(out.len(), 2);
        assert_eq!(out.drain(), vec![NetMsg::InRoom, NetMsg::Leave]);
        assert!(out.is_empty());
    }
}
