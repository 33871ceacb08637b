//! Relay client.
//!
//! The client maintains:
//! - A reliable stream to the relay, split so a reader task can decode
//!   frames while the main loop writes
//! - The match `Session`, mutated only from the main loop
//! - Held keys driven by console commands
//!
//! Everything that touches the session runs in one `select!` loop: the
//! frame timer, the 25 ms paddle heartbeat, inbound messages and console
//! lines interleave but never run concurrently, so no locks are needed.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use pong_shared::{
    config::PongConfig,
    net::{
        decode_from_bytes, ClientId, MessageSink, NetMsg, ReliableConn, ReliableReader,
        ReliableWriter, PROTOCOL_VERSION,
    },
    render::RenderBackend,
};
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    console::{self, Command, KeyDriver},
    draw, profile, reconcile,
    session::Session,
};

/// High-level game client over any outbound sink.
pub struct PongClient<S: MessageSink> {
    pub session: Session,
    pub input: KeyDriver,
    pub client_id: Option<ClientId>,
    sink: S,
    inbound: mpsc::UnboundedReceiver<NetMsg>,
    profile_path: Option<PathBuf>,
    quit_requested: bool,
}

impl PongClient<ReliableWriter> {
    /// Connects to the relay and performs the handshake.
    pub async fn connect(cfg: PongConfig) -> anyhow::Result<Self> {
        let relay_addr: SocketAddr = cfg.relay_addr.parse().context("parse relay_addr")?;
        info!(relay = %relay_addr, "Connecting to relay");

        let mut conn = ReliableConn::connect(relay_addr).await?;
        conn.send(&NetMsg::Hello {
            protocol: PROTOCOL_VERSION,
        })
        .await?;
        let client_id = match conn.recv().await? {
            NetMsg::Welcome { client_id } => client_id,
            other => anyhow::bail!("expected welcome, got {other:?}"),
        };
        info!(client_id = ?client_id, "Connected to relay");

        let (reader, writer) = conn.into_split();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(read_loop(reader, tx));

        let mut client = Self::new(Session::new(cfg), writer, rx);
        client.client_id = Some(client_id);
        Ok(client)
    }
}

/// Forwards decoded frames to the main loop until the stream ends.
/// Frames that do not decode are skipped; only transport errors end it.
async fn read_loop(mut reader: ReliableReader, tx: mpsc::UnboundedSender<NetMsg>) {
    loop {
        let payload = match reader.recv_payload().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Relay connection closed");
                break;
            }
        };
        match decode_from_bytes(&payload) {
            Ok(msg) => {
                if tx.send(msg).is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, len = payload.len(), "Skipping undecodable frame"),
        }
    }
}

impl<S: MessageSink> PongClient<S> {
    pub fn new(session: Session, sink: S, inbound: mpsc::UnboundedReceiver<NetMsg>) -> Self {
        Self {
            session,
            input: KeyDriver::default(),
            client_id: None,
            sink,
            inbound,
            profile_path: None,
            quit_requested: false,
        }
    }

    /// Remembers name changes in this profile file.
    pub fn with_profile(mut self, path: PathBuf) -> Self {
        self.profile_path = Some(path);
        self
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Registers with the relay.
    pub async fn login(&mut self) -> anyhow::Result<()> {
        self.session.login();
        self.flush().await
    }

    /// Sends everything the session queued, in order.
    pub async fn flush(&mut self) -> anyhow::Result<()> {
        for msg in self.session.drain_outbox() {
            self.sink.send(&msg).await?;
        }
        Ok(())
    }

    /// One render frame: simulate, draw, send.
    pub async fn frame(&mut self, now: Instant, renderer: &mut impl RenderBackend) -> anyhow::Result<()> {
        self.session.frame(now, &self.input.keys);
        self.input.end_frame();
        draw::draw_frame(&self.session, renderer);
        self.flush().await
    }

    /// Sends the paddle position heartbeat.
    pub async fn heartbeat(&mut self) -> anyhow::Result<()> {
        let msg = self.session.heartbeat();
        self.sink.send(&msg).await
    }

    /// Applies one message from the relay.
    pub async fn handle_inbound(&mut self, msg: NetMsg) -> anyhow::Result<()> {
        match msg {
            NetMsg::Ping => match self.client_id {
                Some(client_id) => self.sink.send(&NetMsg::Pong { client_id }).await?,
                None => debug!("Ping before welcome"),
            },
            other => reconcile::apply(&mut self.session, other),
        }
        self.flush().await
    }

    /// Executes a console command.
    pub async fn exec_console(&mut self, line: &str) -> anyhow::Result<Vec<String>> {
        let Some(cmd) = console::parse(line) else {
            return Ok(Vec::new());
        };
        if self.input.apply(&cmd) {
            return Ok(Vec::new());
        }
        match cmd {
            Command::Name(name) => {
                self.session.set_name(&name);
                if let Some(path) = &self.profile_path {
                    profile::save_name(path, &name)?;
                }
                self.flush().await?;
                Ok(vec![format!("Name set to {name}")])
            }
            Command::Status => Ok(self.status_lines()),
            Command::Quit => {
                self.quit_requested = true;
                Ok(vec!["Leaving".to_string()])
            }
            Command::Unknown(line) => Ok(vec![format!("Unknown command: {line}")]),
            _ => Ok(Vec::new()),
        }
    }

    fn status_lines(&self) -> Vec<String> {
        let s = &self.session;
        let ball = s.ball.position();
        let mut lines = vec![
            format!("State: {:?}", s.state()),
            format!("Client ID: {:?}", self.client_id),
            format!("Name: {}", s.player_name),
            format!(
                "Opponent: {}",
                s.opponent_name.as_deref().unwrap_or("(none)")
            ),
            format!("Score: {} - {}", s.scores.player, s.scores.opponent),
            format!("Ball: ({:.1}, {:.1})", ball.x, ball.y),
        ];
        if let Some(left) = s.serve_remaining(Instant::now()) {
            lines.push(format!("Serve in: {} ms", left.as_millis()));
        }
        lines
    }

    /// Runs until the relay disconnects, `quit` is entered, the console
    /// closes or the process is interrupted. The last three send `leave`.
    pub async fn run(
        &mut self,
        mut console_rx: mpsc::Receiver<String>,
        renderer: &mut impl RenderBackend,
    ) -> anyhow::Result<()> {
        let mut frame = time::interval(self.session.cfg.frame_interval());
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut heartbeat = time::interval(self.session.cfg.heartbeat_interval());
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = frame.tick() => {
                    self.frame(Instant::now(), renderer).await?;
                }
                _ = heartbeat.tick() => {
                    self.heartbeat().await?;
                }
                msg = self.inbound.recv() => match msg {
                    Some(msg) => self.handle_inbound(msg).await?,
                    None => {
                        info!("Relay disconnected");
                        break;
                    }
                },
                line = console_rx.recv() => match line {
                    Some(line) => {
                        for out in self.exec_console(&line).await? {
                            println!("{out}");
                        }
                    }
                    None => {
                        info!("Console closed");
                        self.quit_requested = true;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    self.quit_requested = true;
                }
            }

            if self.quit_requested {
                // Best effort; the relay may already be gone.
                if let Err(e) = self.sink.send(&NetMsg::Leave).await {
                    debug!(error = %e, "Leave not delivered");
                }
                break;
            }
        }
        Ok(())
    }
}
