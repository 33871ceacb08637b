//! Match session.
//!
//! One `Session` owns everything a match mutates: the game state, both
//! paddles, the ball, the score pair, the tick and serve timers, and the
//! outbox of messages for the peer. A new session (or `reset_match`) is a
//! new match; nothing lives in globals.
//!
//! Authority rules:
//! - The player paddle (right side) is simulated here and announced to the
//!   peer. The opponent paddle (left side) only mirrors inbound messages.
//! - The ball is simulated on both sides. A bounce off the player paddle is
//!   decided here and sent as `paddleHit`; a touch of the opponent paddle
//!   only freezes the ball until the peer's `paddleHit` arrives.
//! - Only a right-wall exit is detected locally (`opponentScored`). The
//!   left-wall case is the peer's right wall and arrives as a message, so
//!   each point is counted exactly once.
//! - Scores are overwritten from the relay's `scores`, never incremented.

use std::time::{Duration, Instant};

use pong_shared::{
    ball::{serve_vector, Ball},
    config::PongConfig,
    event::Outbox,
    hitbox::WallSide,
    math::Vector,
    net::{NetMsg, Scores},
    paddle::{Paddle, PaddleSide},
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::{
    input::{paddle_speed, KeySource, START_KEY},
    sim::{self, TickClock},
};

/// Session-wide game state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Logged in, no opponent yet.
    Waiting,
    /// Paired; space serves.
    Start,
    /// Ball placed, short pause before play.
    Serve,
    Playing,
    Over,
}

pub struct Session {
    pub cfg: PongConfig,
    state: GameState,
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
    pub scores: Scores,
    pub player_name: String,
    pub opponent_name: Option<String>,
    clock: TickClock,
    serve_started: Option<Instant>,
    rng: StdRng,
    outbox: Outbox,
}

impl Session {
    pub fn new(cfg: PongConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let court = cfg.court;
        let physics = cfg.physics;
        let mut session = Self {
            clock: TickClock::new(cfg.tick_interval()),
            player_name: cfg.player_name.clone(),
            opponent_name: None,
            state: GameState::Waiting,
            player: Paddle::new(PaddleSide::Player, court, &physics),
            opponent: Paddle::new(PaddleSide::Opponent, court, &physics),
            ball: Ball::centered(court, &physics),
            scores: Scores::default(),
            serve_started: None,
            rng,
            outbox: Outbox::new(),
            cfg,
        };
        session.reset_match();
        session
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn set_state(&mut self, next: GameState) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, "Game state changed");
            self.state = next;
        }
    }

    /// Queues a message for the peer.
    pub(crate) fn emit(&mut self, msg: NetMsg) {
        debug!(event = msg.event_name(), "Queue outbound");
        self.outbox.push(msg);
    }

    /// Takes the messages produced since the last drain.
    pub fn drain_outbox(&mut self) -> Vec<NetMsg> {
        self.outbox.drain()
    }

    pub fn pending_outbound(&self) -> impl Iterator<Item = &NetMsg> {
        self.outbox.iter()
    }

    /// Registers with the relay under the current display name.
    pub fn login(&mut self) {
        let name = self.player_name.clone();
        self.emit(NetMsg::Login { name });
    }

    /// Changes the display name and tells the relay.
    pub fn set_name(&mut self, name: &str) {
        self.player_name = name.to_string();
        self.emit(NetMsg::SetName {
            name: name.to_string(),
        });
    }

    /// Fresh paddles, ball and scores. The state is left to the caller.
    pub fn reset_match(&mut self) {
        let court = self.cfg.court;
        let physics = self.cfg.physics;
        self.player = Paddle::new(PaddleSide::Player, court, &physics);
        self.opponent = Paddle::new(PaddleSide::Opponent, court, &physics);
        self.ball = Ball::serve(court, &physics, &mut self.rng, false);
        self.scores = Scores::default();
        self.clock.reset();
        self.serve_started = None;
    }

    /// Draws a serve vector aimed at the local player's side.
    pub fn fresh_serve_vector(&mut self) -> Vector {
        serve_vector(&self.cfg.physics, &mut self.rng, false)
    }

    /// Starts a rally from `vector`, given in the sender's orientation.
    /// Vectors from the peer are mirrored into this court.
    pub fn serve(&mut self, vector: Vector, from_opponent: bool) {
        let court = self.cfg.court;
        self.player.reset_position(court);
        self.opponent.reset_position(court);
        self.ball = Ball::centered(court, &self.cfg.physics);
        self.ball
            .set_vector(if from_opponent { vector.invert() } else { vector });
        self.serve_started = None;
        self.set_state(GameState::Serve);
    }

    /// Paddle position heartbeat for the peer. Sent regardless of state.
    pub fn heartbeat(&self) -> NetMsg {
        NetMsg::PaddlePosition {
            y: self.player.center_y(),
        }
    }

    /// Sets the player paddle speed, announcing only actual changes.
    pub fn set_player_speed(&mut self, speed: f64) {
        if self.player.set_speed(speed) {
            self.emit(NetMsg::PaddleSpeedChange { speed });
        }
    }

    /// One render-frame callback: state management, then at most one
    /// physics tick and key handling while playing.
    pub fn frame(&mut self, now: Instant, keys: &impl KeySource) {
        self.manage_state(now, keys);
        if self.state == GameState::Playing {
            if self.clock.try_tick(now) {
                sim::tick(self);
            }
            let speed = paddle_speed(keys, self.cfg.physics.max_paddle_speed);
            self.set_player_speed(speed);
        }
    }

    fn manage_state(&mut self, now: Instant, keys: &impl KeySource) {
        match self.state {
            GameState::Waiting => {}
            GameState::Start => {
                if keys.is_key_pressed(START_KEY) {
                    let vector = self.fresh_serve_vector();
                    info!(degrees = vector.degrees, "Starting match");
                    self.emit(NetMsg::StartGame { vector });
                    self.serve(vector, false);
                }
            }
            GameState::Playing => {
                let target = self.cfg.points_to_win;
                if self.scores.player >= target || self.scores.opponent >= target {
                    info!(
                        player = self.scores.player,
                        opponent = self.scores.opponent,
                        "Match over"
                    );
                    self.set_state(GameState::Over);
                    return;
                }
                if self.ball.hitbox.hits_wall(WallSide::Right, self.cfg.court) {
                    let vector = self.fresh_serve_vector();
                    info!("Ball got past the player");
                    self.emit(NetMsg::OpponentScored { vector });
                    self.serve(vector, false);
                }
            }
            GameState::Serve => {
                let started = *self.serve_started.get_or_insert(now);
                if now.saturating_duration_since(started) >= self.cfg.serve_delay() {
                    self.serve_started = None;
                    self.clock.reset();
                    self.set_state(GameState::Playing);
                }
            }
            GameState::Over => {
                if keys.is_key_pressed(START_KEY) {
                    self.restart();
                }
            }
        }
    }

    /// Back to the lobby for a new match.
    pub fn restart(&mut self) {
        self.reset_match();
        self.opponent_name = None;
        self.set_state(GameState::Waiting);
        self.login();
    }

    /// Time left in the serve pause, if serving.
    pub fn serve_remaining(&self, now: Instant) -> Option<Duration> {
        if self.state != GameState::Serve {
            return None;
        }
        let started = self.serve_started.unwrap_or(now);
        Some(
            self.cfg
                .serve_delay()
                .saturating_sub(now.saturating_duration_since(started)),
        )
    }
}
