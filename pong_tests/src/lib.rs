//! Test fixtures: a one-room loopback relay.
//!
//! `RelayRoom` is the routing logic only, so in-process tests can pair two
//! sessions without sockets. `LoopbackRelay` runs the same room over real
//! TCP connections for end-to-end tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use pong_shared::{
    config::PongConfig,
    net::{ClientId, NetMsg, ReliableConn, ReliableListener, ReliableWriter, Scores, PROTOCOL_VERSION},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Index of a player in the room: 0 or 1.
pub type Slot = usize;

fn other(slot: Slot) -> Slot {
    1 - slot
}

/// Pairing, forwarding and score keeping for two players.
#[derive(Debug, Default)]
pub struct RelayRoom {
    names: [Option<String>; 2],
    points: [u32; 2],
    paired: bool,
}

impl RelayRoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Points as seen by `slot`.
    pub fn scores_for(&self, slot: Slot) -> Scores {
        Scores {
            player: self.points[slot],
            opponent: self.points[other(slot)],
        }
    }

    fn pairing(&self, slot: Slot) -> Vec<(Slot, NetMsg)> {
        let mut out = vec![(slot, NetMsg::InRoom)];
        if let Some(name) = &self.names[other(slot)] {
            out.push((slot, NetMsg::OpponentName { name: name.clone() }));
        }
        out
    }

    /// Routes one message from `from`. Returns the messages to deliver.
    pub fn route(&mut self, from: Slot, msg: NetMsg) -> Vec<(Slot, NetMsg)> {
        let to = other(from);
        match msg {
            NetMsg::Login { name } => {
                self.names[from] = Some(name);
                if self.paired {
                    // Re-login after a finished match.
                    return self.pairing(from);
                }
                if self.names[to].is_some() {
                    self.paired = true;
                    self.points = [0, 0];
                    let mut out = self.pairing(0);
                    out.extend(self.pairing(1));
                    return out;
                }
                Vec::new()
            }
            NetMsg::SetName { name } => {
                self.names[from] = Some(name.clone());
                if self.paired {
                    vec![(to, NetMsg::OpponentName { name })]
                } else {
                    Vec::new()
                }
            }
            NetMsg::StartGame { .. } if self.paired => {
                self.points = [0, 0];
                vec![
                    (to, msg),
                    (0, NetMsg::Scores(self.scores_for(0))),
                    (1, NetMsg::Scores(self.scores_for(1))),
                ]
            }
            NetMsg::PaddleHit(_) | NetMsg::PaddleSpeedChange { .. } | NetMsg::PaddlePosition { .. }
                if self.paired =>
            {
                vec![(to, msg)]
            }
            NetMsg::OpponentScored { vector } if self.paired => {
                self.points[to] += 1;
                vec![
                    (to, NetMsg::Scored { vector }),
                    (0, NetMsg::Scores(self.scores_for(0))),
                    (1, NetMsg::Scores(self.scores_for(1))),
                ]
            }
            NetMsg::Leave => self.leave(from),
            other => {
                debug!(from, event = other.event_name(), "Relay dropped message");
                Vec::new()
            }
        }
    }

    /// `slot` is gone. The other player is sent back to waiting.
    pub fn leave(&mut self, slot: Slot) -> Vec<(Slot, NetMsg)> {
        self.names[slot] = None;
        self.points = [0, 0];
        if std::mem::take(&mut self.paired) {
            vec![(other(slot), NetMsg::CancelGame)]
        } else {
            Vec::new()
        }
    }
}

/// TCP relay hosting a single room.
pub struct LoopbackRelay {
    listener: ReliableListener,
}

/// Binds a relay on an ephemeral localhost port and returns a client
/// config pointing at it.
pub async fn bind_ephemeral() -> anyhow::Result<(LoopbackRelay, PongConfig)> {
    let listener = ReliableListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).await?;
    let cfg = PongConfig {
        relay_addr: listener.local_addr()?.to_string(),
        ..Default::default()
    };
    Ok((LoopbackRelay { listener }, cfg))
}

impl LoopbackRelay {
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts one client and completes the handshake.
    pub async fn accept_one(&self, client_id: ClientId) -> anyhow::Result<ReliableConn> {
        let (mut conn, peer) = self.listener.accept().await?;
        match conn.recv().await? {
            NetMsg::Hello { protocol } if protocol == PROTOCOL_VERSION => {
                conn.send(&NetMsg::Welcome { client_id }).await?;
                info!(client_id = ?client_id, %peer, "Client connected");
                Ok(conn)
            }
            other => anyhow::bail!("unexpected handshake msg: {other:?}"),
        }
    }

    /// Accepts two clients and relays between them until one leaves.
    /// Returns every message received, tagged with its sender.
    pub async fn run_room(self) -> anyhow::Result<Vec<(Slot, NetMsg)>> {
        let a = self.accept_one(ClientId(1)).await?;
        let b = self.accept_one(ClientId(2)).await?;

        let (tx, mut rx) = mpsc::unbounded_channel::<(Slot, Option<NetMsg>)>();
        let mut writers: Vec<ReliableWriter> = Vec::with_capacity(2);
        for (slot, conn) in [a, b].into_iter().enumerate() {
            let (mut reader, writer) = conn.into_split();
            writers.push(writer);
            let tx = tx.clone();
            tokio::spawn(async move {
                loop {
                    match reader.recv().await {
                        Ok(msg) => {
                            if tx.send((slot, Some(msg))).is_err() {
                                break;
                            }
                        }
                        Err(_) => {
                            let _ = tx.send((slot, None));
                            break;
                        }
                    }
                }
            });
        }
        drop(tx);

        let mut room = RelayRoom::new();
        let mut log = Vec::new();
        while let Some((slot, msg)) = rx.recv().await {
            let (out, done) = match msg {
                Some(msg) => {
                    log.push((slot, msg.clone()));
                    let done = msg == NetMsg::Leave;
                    (room.route(slot, msg), done)
                }
                None => {
                    info!(slot, "Client disconnected");
                    (room.leave(slot), true)
                }
            };
            for (to, msg) in out {
                if let Err(e) = writers[to].send(&msg).await {
                    warn!(slot = to, error = %e, "Relay send failed");
                }
            }
            if done {
                break;
            }
        }
        Ok(log)
    }
}
