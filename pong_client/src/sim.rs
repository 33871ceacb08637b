//! Local simulation loop.
//!
//! The frame callback polls a `TickClock`; when a tick is due it runs
//! exactly one fixed step. There is no catch-up: if frames stall, the game
//! slows down instead of jumping ahead.

use std::time::{Duration, Instant};

use pong_shared::{
    math::Vector,
    net::{NetMsg, PaddleHit},
    physics::bounce_degrees,
};
use tracing::debug;

use crate::session::Session;

/// Fixed-interval gate polled once per frame.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    last: Option<Instant>,
}

impl TickClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true (and restarts the interval) when a tick is due.
    pub fn try_tick(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Which paddle the ball touched this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Not ours to resolve; the ball waits for the peer's `paddleHit`.
    Opponent,
    /// Resolved locally and announced.
    Player,
}

/// One fixed physics step: collisions, both paddles, then the ball.
pub fn tick(session: &mut Session) -> Option<Collision> {
    let collision = check_paddle_collisions(session);
    let court = session.cfg.court;
    session.player.step(court);
    session.opponent.step(court);
    session.ball.step(court);
    collision
}

/// Tests the ball against the opponent paddle, then the player paddle.
/// At most one collision is handled per tick.
pub fn check_paddle_collisions(session: &mut Session) -> Option<Collision> {
    if session.ball.hitbox.collides_with(&session.opponent.hitbox) {
        session.ball.set_vector(Vector::ZERO);
        debug!("Ball touched opponent paddle, awaiting peer");
        return Some(Collision::Opponent);
    }
    if session.ball.hitbox.collides_with(&session.player.hitbox) {
        bounce_off_player(session);
        return Some(Collision::Player);
    }
    None
}

fn bounce_off_player(session: &mut Session) {
    let physics = session.cfg.physics;
    let court = session.cfg.court;
    let paddle_y = session.player.center_y();
    let ball_pos = session.ball.position();

    let degrees = bounce_degrees(paddle_y - ball_pos.y, &physics);

    // Flush against the paddle face so the ball cannot tunnel through it.
    let face_x = session.player.hitbox.nw_x - session.ball.hitbox.width() / 2.0 - 1.0;
    session.ball.set_position(face_x, ball_pos.y);
    session.ball.set_vector(Vector::new(physics.ball_speed, degrees));
    session.ball.step(court);

    let hit = PaddleHit {
        ball: session.ball.position(),
        vector: session.ball.vector(),
        paddle_y,
    };
    debug!(degrees, x = hit.ball.x, y = hit.ball.y, "Player paddle hit");
    session.emit(NetMsg::PaddleHit(hit));
}

#[cfg(test)]
mod tests {
    use pong_shared::config::PongConfig;

    use super::*;

    fn session() -> Session {
        Session::new(PongConfig {
            seed: Some(11),
            ..Default::default()
        })
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn clock_allows_one_tick_per_interval() {
        let mut clock = TickClock::new(Duration::from_millis(16));
        let t0 = Instant::now();
        assert!(clock.try_tick(t0));
        assert!(!clock.try_tick(t0 + Duration::from_millis(10)));
        assert!(clock.try_tick(t0 + Duration::from_millis(16)));
        // A long stall still yields a single tick.
        assert!(clock.try_tick(t0 + Duration::from_millis(500)));
        assert!(!clock.try_tick(t0 + Duration::from_millis(501)));
    }

    #[test]
    fn free_tick_translates_ball_exactly() {
        let mut s = session();
        s.ball.set_position(300.0, 200.0);
        s.ball.vx = 3.0;
        s.ball.vy = -2.5;
        assert_eq!(tick(&mut s), None);
        assert_eq!(s.ball.position().x, 303.0);
        assert_eq!(s.ball.position().y, 197.5);
        assert!(s.drain_outbox().is_empty());
    }

    #[test]
    fn opponent_paddle_touch_freezes_ball() {
        let mut s = session();
        let y = s.opponent.center_y();
        s.ball.set_position(s.opponent.hitbox.position().x + 10.0, y);
        s.ball.vx = -10.0;
        assert_eq!(tick(&mut s), Some(Collision::Opponent));
        assert_eq!((s.ball.vx, s.ball.vy), (0.0, 0.0));
        assert!(s.drain_outbox().is_empty());
    }

    #[test]
    fn player_edge_hit_bounces_at_max_angle() {
        // Ball 40px below the paddle center on a 600x400 court.
        let mut s = session();
        s.player.set_y(160.0);
        s.ball.set_position(530.0, 200.0);
        s.ball.vx = 10.0;
        s.ball.vy = 0.0;

        assert_eq!(check_paddle_collisions(&mut s), Some(Collision::Player));

        // 180 - (-40 * 60 / 40) = 240 degrees: back left and down the screen.
        let v = s.ball.vector();
        assert!(approx(v.magnitude, 15.0));
        assert!(approx(s.ball.vx, -7.5));
        assert!(approx(s.ball.vy, 15.0 * 3f64.sqrt() / 2.0));

        // Flush against the face (535 - 10 - 1 = 524), then one extra step.
        let p = s.ball.position();
        assert!(approx(p.x, 524.0 - 7.5));
        assert!(approx(p.y, 200.0 + 15.0 * 3f64.sqrt() / 2.0));

        let out = s.drain_outbox();
        assert_eq!(out.len(), 1);
        let NetMsg::PaddleHit(hit) = out[0] else {
            panic!("expected paddleHit, got {:?}", out[0]);
        };
        assert_eq!(hit.paddle_y, 160.0);
        assert_eq!(hit.ball, p);
        assert!(approx(hit.vector.magnitude, 15.0));
    }

    #[test]
    fn center_hit_returns_straight() {
        let mut s = session();
        s.ball.set_position(530.0, 200.0);
        s.ball.vx = 10.0;
        s.ball.vy = 0.0;
        check_paddle_collisions(&mut s);
        assert!(approx(s.ball.vx, -15.0));
        assert!(approx(s.ball.vy, 0.0));
    }

    #[test]
    fn opponent_collision_wins_over_player() {
        let mut s = session();
        // Squeeze both paddles onto the ball.
        s.opponent.hitbox.set_position(300.0, 200.0);
        s.player.hitbox.set_position(305.0, 200.0);
        s.ball.set_position(302.0, 200.0);
        assert_eq!(check_paddle_collisions(&mut s), Some(Collision::Opponent));
        assert!(s.drain_outbox().is_empty());
    }

    #[test]
    fn paddles_move_with_their_speed() {
        let mut s = session();
        s.player.set_speed(10.0);
        s.opponent.set_speed(-10.0);
        s.ball.vx = 0.0;
        s.ball.vy = 0.0;
        tick(&mut s);
        assert_eq!(s.player.center_y(), 210.0);
        assert_eq!(s.opponent.center_y(), 190.0);
    }
}
