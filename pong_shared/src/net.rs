//! Networking primitives.
//!
//! Goals:
//! - Define every event exchanged with the relay as one `NetMsg` enum.
//! - Provide a reliable (TCP) channel with length-prefixed JSON frames.
//! - Keep serialization explicit and versionable.
//!
//! Ball state in a payload is always in the sender's court orientation
//! (sender's paddle on the right). Receivers mirror it on arrival.

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpListener, TcpStream,
    },
    sync::mpsc,
};

use tracing::{debug, trace};

use crate::math::{Point, Vector};

/// Protocol version for compatibility checks.
pub const PROTOCOL_VERSION: u32 = 1;

/// Frames larger than this are rejected.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Identifies a connection at the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u32);

/// Score pair from the receiver's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "self")]
    pub player: u32,
    pub opponent: u32,
}

/// Authoritative result of a bounce off the sender's own paddle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleHit {
    /// Ball center after the bounce.
    pub ball: Point,
    pub vector: Vector,
    /// Center y of the paddle that was hit.
    pub paddle_y: f64,
}

/// Every event exchanged with the relay.
///
/// Wire shape: `{"event": "paddleHit", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum NetMsg {
    // ─── Connection handshake ───
    Hello {
        protocol: u32,
    },
    Welcome {
        client_id: ClientId,
    },
    /// Relay liveness check.
    Ping,
    /// Answer to `Ping`.
    Pong {
        client_id: ClientId,
    },

    // ─── Room ───
    Login {
        name: String,
    },
    SetName {
        name: String,
    },
    /// Both players are paired.
    InRoom,
    OpponentName {
        name: String,
    },
    /// Peer disconnected; hard reset.
    CancelGame,
    /// Sent on shutdown, fire-and-forget.
    Leave,

    // ─── Gameplay ───
    /// First serve of a match.
    StartGame {
        vector: Vector,
    },
    PaddleHit(PaddleHit),
    /// Edge-triggered velocity change of the sender's paddle.
    PaddleSpeedChange {
        speed: f64,
    },
    /// Periodic absolute position of the sender's paddle.
    PaddlePosition {
        y: f64,
    },
    /// The ball got past the sender; carries the next serve.
    OpponentScored {
        vector: Vector,
    },
    /// Relay -> the scoring side: serve with this vector.
    Scored {
        vector: Vector,
    },
    /// Relay-owned score pair; overwrites local counters.
    Scores(Scores),
}

impl NetMsg {
    /// Event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            NetMsg::Hello { .. } => "hello",
            NetMsg::Welcome { .. } => "welcome",
            NetMsg::Ping => "ping",
            NetMsg::Pong { .. } => "pong",
            NetMsg::Login { .. } => "login",
            NetMsg::SetName { .. } => "setName",
            NetMsg::InRoom => "inRoom",
            NetMsg::OpponentName { .. } => "opponentName",
            NetMsg::CancelGame => "cancelGame",
            NetMsg::Leave => "leave",
            NetMsg::StartGame { .. } => "startGame",
            NetMsg::PaddleHit(_) => "paddleHit",
            NetMsg::PaddleSpeedChange { .. } => "paddleSpeedChange",
            NetMsg::PaddlePosition { .. } => "paddlePosition",
            NetMsg::OpponentScored { .. } => "opponentScored",
            NetMsg::Scored { .. } => "scored",
            NetMsg::Scores(_) => "scores",
        }
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(w: &mut W, msg: &NetMsg) -> anyhow::Result<()> {
    let payload = serde_json::to_vec(msg).context("serialize msg")?;
    if payload.len() > MAX_FRAME_LEN {
        bail!("frame of {} bytes exceeds limit", payload.len());
    }
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.extend_from_slice(&payload);
    w.write_all(&buf).await.context("tcp write")?;
    Ok(())
}

/// Reads one frame's payload. Errors here leave the stream out of sync.
async fn read_payload<R: AsyncRead + Unpin>(r: &mut R) -> anyhow::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf).await.context("tcp read len")?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        bail!("frame of {len} bytes exceeds limit");
    }
    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)
        .await
        .context("tcp read payload")?;
    Ok(payload)
}

async fn read_frame<R: AsyncRead + Unpin>(r: &mut R) -> anyhow::Result<NetMsg> {
    let payload = read_payload(r).await?;
    let msg: NetMsg = serde_json::from_slice(&payload).context("deserialize msg")?;
    trace!(event = msg.event_name(), len = payload.len(), "Frame received");
    Ok(msg)
}

/// Reliable connection over TCP with length-prefixed frames.
#[derive(Debug)]
pub struct ReliableConn {
    stream: TcpStream,
}

impl ReliableConn {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await.context("tcp connect")?;
        stream.set_nodelay(true).context("tcp nodelay")?;
        Ok(Self::new(stream))
    }

    pub async fn send(&mut self, msg: &NetMsg) -> anyhow::Result<()> {
        write_frame(&mut self.stream, msg).await
    }

    pub async fn recv(&mut self) -> anyhow::Result<NetMsg> {
        read_frame(&mut self.stream).await
    }

    pub fn peer_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Splits into halves so reads can run in their own task.
    pub fn into_split(self) -> (ReliableReader, ReliableWriter) {
        let (read, write) = self.stream.into_split();
        (ReliableReader { read }, ReliableWriter { write })
    }
}

/// Read half of a `ReliableConn`.
#[derive(Debug)]
pub struct ReliableReader {
    read: OwnedReadHalf,
}

impl ReliableReader {
    pub async fn recv(&mut self) -> anyhow::Result<NetMsg> {
        read_frame(&mut self.read).await
    }

    /// Reads a raw frame without decoding it. Only transport failures are
    /// errors; a payload that does not decode can be skipped and the next
    /// frame read normally.
    pub async fn recv_payload(&mut self) -> anyhow::Result<Vec<u8>> {
        read_payload(&mut self.read).await
    }
}

/// Write half of a `ReliableConn`.
#[derive(Debug)]
pub struct ReliableWriter {
    write: OwnedWriteHalf,
}

impl ReliableWriter {
    pub async fn send(&mut self, msg: &NetMsg) -> anyhow::Result<()> {
        write_frame(&mut self.write, msg).await
    }
}

/// TCP listener producing `ReliableConn`s.
pub struct ReliableListener {
    listener: TcpListener,
}

impl ReliableListener {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await.context("tcp bind")?;
        Ok(Self { listener })
    }

    pub async fn accept(&self) -> anyhow::Result<(ReliableConn, SocketAddr)> {
        let (stream, addr) = self.listener.accept().await.context("tcp accept")?;
        stream.set_nodelay(true).context("tcp nodelay")?;
        debug!(peer = %addr, "Accepted connection");
        Ok((ReliableConn::new(stream), addr))
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

/// Outbound half of a relay connection.
#[async_trait]
pub trait MessageSink: Send {
    async fn send(&mut self, msg: &NetMsg) -> anyhow::Result<()>;
}

#[async_trait]
impl MessageSink for ReliableWriter {
    async fn send(&mut self, msg: &NetMsg) -> anyhow::Result<()> {
        ReliableWriter::send(self, msg).await
    }
}

#[async_trait]
impl MessageSink for mpsc::UnboundedSender<NetMsg> {
    async fn send(&mut self, msg: &NetMsg) -> anyhow::Result<()> {
        mpsc::UnboundedSender::send(self, msg.clone()).context("channel closed")
    }
}

/// Convenience codec helpers.
pub fn encode_to_bytes(msg: &NetMsg) -> anyhow::Result<Bytes> {
    let payload = serde_json::to_vec(msg).context("serialize")?;
    Ok(Bytes::from(payload))
}

pub fn decode_from_bytes(b: &[u8]) -> anyhow::Result<NetMsg> {
    serde_json::from_slice(b).context("deserialize")
}
