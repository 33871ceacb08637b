//! Single-player mode against a computer paddle.
//!
//! Shares the kinematics with the networked game but none of its
//! protocol: both paddles bounce the ball locally and both walls score.
//! The computer's controller lives only here.

use std::time::Instant;

use pong_shared::{
    ball::Ball,
    config::PongConfig,
    hitbox::WallSide,
    math::Vector,
    net::Scores,
    paddle::{Paddle, PaddleSide},
    physics::{bounce_degrees, deflection_degrees},
    render::RenderBackend,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::{
    draw,
    input::{paddle_speed, KeySource, START_KEY},
    sim::TickClock,
};

/// Proportional gain of the computer paddle.
pub const COMPUTER_KP: f64 = 0.1;

/// Upper bound on rollout steps when predicting the ball.
const MAX_ROLLOUT_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoloState {
    Start,
    Serve,
    Playing,
    Over,
}

pub struct SoloSession {
    pub cfg: PongConfig,
    state: SoloState,
    pub player: Paddle,
    pub computer: Paddle,
    pub ball: Ball,
    /// `opponent` is the computer.
    pub scores: Scores,
    clock: TickClock,
    serve_started: Option<Instant>,
    rng: StdRng,
}

impl SoloSession {
    pub fn new(cfg: PongConfig) -> Self {
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let court = cfg.court;
        let physics = cfg.physics;
        Self {
            state: SoloState::Start,
            player: Paddle::new(PaddleSide::Player, court, &physics),
            computer: Paddle::new(PaddleSide::Opponent, court, &physics),
            ball: Ball::serve(court, &physics, &mut rng, false),
            scores: Scores::default(),
            clock: TickClock::new(cfg.tick_interval()),
            serve_started: None,
            rng,
            cfg,
        }
    }

    pub fn state(&self) -> SoloState {
        self.state
    }

    fn set_state(&mut self, next: SoloState) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, "Solo state changed");
            self.state = next;
        }
    }

    fn new_game(&mut self) {
        let court = self.cfg.court;
        let physics = self.cfg.physics;
        self.player = Paddle::new(PaddleSide::Player, court, &physics);
        self.computer = Paddle::new(PaddleSide::Opponent, court, &physics);
        self.ball = Ball::serve(court, &physics, &mut self.rng, false);
        self.scores = Scores::default();
        self.clock.reset();
    }

    fn next_rally(&mut self, toward_left: bool) {
        let court = self.cfg.court;
        self.ball = Ball::serve(court, &self.cfg.physics, &mut self.rng, toward_left);
        self.player.reset_position(court);
        self.computer.reset_position(court);
        self.set_state(SoloState::Serve);
    }

    fn set_clamped_speed(paddle: &mut Paddle, speed: f64, max: f64) {
        paddle.set_speed(speed.clamp(-max, max));
    }

    pub fn frame(&mut self, now: Instant, keys: &impl KeySource) {
        self.manage_state(now, keys);
        if self.state == SoloState::Playing {
            if self.clock.try_tick(now) {
                self.tick();
            }
            let max = self.cfg.physics.max_paddle_speed;
            Self::set_clamped_speed(&mut self.player, paddle_speed(keys, max), max);
            self.move_computer_paddle();
        }
    }

    fn manage_state(&mut self, now: Instant, keys: &impl KeySource) {
        match self.state {
            SoloState::Start => {
                if keys.is_key_pressed(START_KEY) {
                    self.set_state(SoloState::Serve);
                }
            }
            SoloState::Playing => {
                let target = self.cfg.points_to_win;
                if self.scores.player >= target || self.scores.opponent >= target {
                    self.set_state(SoloState::Over);
                    return;
                }
                let court = self.cfg.court;
                if self.ball.hitbox.hits_wall(WallSide::Left, court) {
                    self.scores.player += 1;
                    self.next_rally(true);
                } else if self.ball.hitbox.hits_wall(WallSide::Right, court) {
                    self.scores.opponent += 1;
                    self.next_rally(false);
                }
            }
            SoloState::Serve => {
                let started = *self.serve_started.get_or_insert(now);
                if now.saturating_duration_since(started) >= self.cfg.serve_delay() {
                    self.serve_started = None;
                    self.set_state(SoloState::Playing);
                }
            }
            SoloState::Over => {
                if keys.is_key_pressed(START_KEY) {
                    self.new_game();
                    self.set_state(SoloState::Serve);
                }
            }
        }
    }

    /// One fixed step. Both paddle bounces are resolved locally.
    pub fn tick(&mut self) {
        let physics = self.cfg.physics;
        let court = self.cfg.court;
        let ball_y = self.ball.position().y;
        if self.ball.hitbox.collides_with(&self.computer.hitbox) {
            let degrees = deflection_degrees(self.computer.center_y() - ball_y, &physics);
            self.ball.set_vector(Vector::new(physics.ball_speed, degrees));
        } else if self.ball.hitbox.collides_with(&self.player.hitbox) {
            let degrees = bounce_degrees(self.player.center_y() - ball_y, &physics);
            self.ball.set_vector(Vector::new(physics.ball_speed, degrees));
        }
        self.player.step(court);
        self.computer.step(court);
        self.ball.step(court);
    }

    /// Where the ball will cross the computer paddle's face, if it is
    /// heading there from the computer's half.
    pub fn computer_setpoint(&self) -> Option<f64> {
        let court = self.cfg.court;
        if self.ball.vx >= 0.0 || self.ball.position().x > court.center_x() {
            return None;
        }
        let face = self.computer.hitbox.nw_x + self.computer.hitbox.width();
        let mut probe = self.ball.clone();
        for _ in 0..MAX_ROLLOUT_STEPS {
            if probe.position().x <= face {
                return Some(probe.position().y);
            }
            probe.step(court);
        }
        None
    }

    fn move_computer_paddle(&mut self) {
        let max = self.cfg.physics.max_paddle_speed;
        let speed = match self.computer_setpoint() {
            Some(target) => (target - self.computer.center_y()) * COMPUTER_KP,
            None => 0.0,
        };
        Self::set_clamped_speed(&mut self.computer, speed, max);
    }

    pub fn draw_frame(&self, r: &mut impl RenderBackend) {
        let court = self.cfg.court;
        draw::draw_field(
            court,
            matches!(self.state, SoloState::Serve | SoloState::Playing),
            r,
        );
        match self.state {
            SoloState::Start => draw::draw_title(court, "pong", "press space to start", r),
            SoloState::Over => {
                let headline = if self.scores.player > self.scores.opponent {
                    "you won!"
                } else {
                    "game over"
                };
                draw::draw_title(court, headline, "press space to play again", r);
            }
            SoloState::Serve | SoloState::Playing => {
                draw::draw_elements(&self.player, &self.computer, &self.ball, r);
                draw::draw_scores(court, self.scores, r);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::HeldKeys;

    fn solo() -> SoloSession {
        SoloSession::new(PongConfig {
            seed: Some(21),
            ..Default::default()
        })
    }

    fn space() -> HeldKeys {
        let mut keys = HeldKeys::new();
        keys.press(START_KEY);
        keys
    }

    #[test]
    fn space_serves_then_plays() {
        let mut s = solo();
        let t0 = Instant::now();
        s.frame(t0, &space());
        assert_eq!(s.state(), SoloState::Serve);
        s.frame(t0 + Duration::from_millis(100), &HeldKeys::new());
        s.frame(t0 + Duration::from_millis(900), &HeldKeys::new());
        assert_eq!(s.state(), SoloState::Playing);
    }

    #[test]
    fn both_walls_score() {
        let mut s = solo();
        s.state = SoloState::Playing;
        s.ball.set_position(5.0, 200.0);
        s.frame(Instant::now(), &HeldKeys::new());
        assert_eq!(s.scores.player, 1);
        assert_eq!(s.state(), SoloState::Serve);
        // Served toward the computer after the player scores.
        assert!(s.ball.vx < 0.0);

        s.state = SoloState::Playing;
        s.ball.set_position(595.0, 200.0);
        s.frame(Instant::now(), &HeldKeys::new());
        assert_eq!(s.scores.opponent, 1);
    }

    #[test]
    fn computer_bounce_heads_right() {
        let mut s = solo();
        let paddle = s.computer.hitbox.position();
        s.ball.set_position(paddle.x + 12.0, paddle.y);
        s.ball.set_vector(Vector::new(15.0, 180.0));
        s.tick();
        assert!((s.ball.vx - 15.0).abs() < 1e-9);
    }

    #[test]
    fn setpoint_only_when_ball_approaches() {
        let mut s = solo();
        s.ball.set_position(250.0, 200.0);
        s.ball.set_vector(Vector::new(10.0, 0.0));
        assert_eq!(s.computer_setpoint(), None);

        s.ball.set_vector(Vector::new(10.0, 180.0));
        let target = s.computer_setpoint().expect("ball is approaching");
        assert!((target - 200.0).abs() < 1e-6);

        s.ball.set_position(400.0, 200.0);
        assert_eq!(s.computer_setpoint(), None);
    }

    #[test]
    fn computer_speed_is_clamped() {
        let mut s = solo();
        s.ball.set_position(250.0, 20.0);
        s.ball.set_vector(Vector::new(10.0, 180.0));
        s.move_computer_paddle();
        assert_eq!(s.computer.speed(), -10.0);
    }

    #[test]
    fn over_restarts_into_serve() {
        let mut s = solo();
        s.state = SoloState::Playing;
        s.scores.player = 7;
        s.frame(Instant::now(), &HeldKeys::new());
        assert_eq!(s.state(), SoloState::Over);
        s.frame(Instant::now(), &space());
        assert_eq!(s.state(), SoloState::Serve);
        assert_eq!(s.scores, Scores::default());
    }
}
