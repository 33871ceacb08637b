//! The ball.
//!
//! A new `Ball` is built for every serve; a ball is never reset in place.

use std::collections::VecDeque;

use rand::Rng;

use crate::{
    config::Court,
    hitbox::{Hitbox, WallSide},
    math::{Point, Vector},
    physics::PhysicsConfig,
};

/// Number of past centers kept for the motion trail.
pub const TRAIL_LEN: usize = 5;

#[derive(Debug, Clone)]
pub struct Ball {
    pub hitbox: Hitbox,
    pub vx: f64,
    pub vy: f64,
    /// Past centers, most recent first.
    trail: VecDeque<Point>,
}

impl Ball {
    /// A motionless ball at the center of the court.
    pub fn centered(court: Court, cfg: &PhysicsConfig) -> Self {
        Self {
            hitbox: Hitbox::from_center(
                court.center_x(),
                court.center_y(),
                cfg.ball_size,
                cfg.ball_size,
            ),
            vx: 0.0,
            vy: 0.0,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    /// A centered ball launched at a random serve angle.
    pub fn serve<R: Rng>(
        court: Court,
        cfg: &PhysicsConfig,
        rng: &mut R,
        toward_left: bool,
    ) -> Self {
        let mut ball = Self::centered(court, cfg);
        ball.set_vector(serve_vector(cfg, rng, toward_left));
        ball
    }

    pub fn position(&self) -> Point {
        self.hitbox.position()
    }

    pub fn set_position(&mut self, center_x: f64, center_y: f64) {
        self.hitbox.set_position(center_x, center_y);
    }

    pub fn set_vector(&mut self, vector: Vector) {
        let (vx, vy) = vector.to_velocity();
        self.vx = vx;
        self.vy = vy;
    }

    pub fn vector(&self) -> Vector {
        Vector::from_velocity(self.vx, self.vy)
    }

    pub fn trail(&self) -> impl Iterator<Item = &Point> {
        self.trail.iter()
    }

    /// Advances one tick: bounce off the top/bottom wall, record the trail,
    /// then translate by the velocity.
    pub fn step(&mut self, court: Court) {
        let x = self.position().x;
        if self.hitbox.hits_wall(WallSide::Top, court) {
            self.hitbox.set_position(x, self.hitbox.height() / 2.0);
            self.vy = -self.vy;
        } else if self.hitbox.hits_wall(WallSide::Bottom, court) {
            self.hitbox
                .set_position(x, court.height - self.hitbox.height() / 2.0);
            self.vy = -self.vy;
        }

        self.trail.push_front(self.position());
        self.trail.truncate(TRAIL_LEN);

        self.hitbox.translate_by(self.vx, self.vy);
    }
}

/// Draws a serve vector: serve speed, angle uniform in
/// `[-max_serve_angle, max_serve_angle]`, mirrored when serving left.
pub fn serve_vector<R: Rng>(cfg: &PhysicsConfig, rng: &mut R, toward_left: bool) -> Vector {
    // A negative limit would make the range empty.
    let max = cfg.max_serve_angle.abs();
    let mut degrees = rng.gen_range(-max..=max);
    if toward_left {
        degrees = 180.0 - degrees;
    }
    Vector::new(cfg.serve_speed(), degrees)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const COURT: Court = Court {
        width: 600.0,
        height: 400.0,
    };

    #[test]
    fn free_step_is_pure_translation() {
        let cfg = PhysicsConfig::default();
        let mut ball = Ball::centered(COURT, &cfg);
        ball.vx = 7.25;
        ball.vy = -3.5;
        let before = ball.position();
        ball.step(COURT);
        let after = ball.position();
        assert_eq!(after.x, before.x + 7.25);
        assert_eq!(after.y, before.y - 3.5);
    }

    #[test]
    fn wall_bounce_flips_vy_and_keeps_magnitude() {
        let cfg = PhysicsConfig::default();
        let mut ball = Ball::centered(COURT, &cfg);
        ball.set_position(300.0, 5.0);
        ball.vx = 4.0;
        ball.vy = -6.0;
        ball.step(COURT);
        assert_eq!(ball.vy, 6.0);
        assert_eq!(ball.vx, 4.0);
        // Flush against the wall, then moved down by the new vy.
        assert_eq!(ball.position().y, 10.0 + 6.0);

        ball.set_position(300.0, 395.0);
        ball.vy = 6.0;
        ball.step(COURT);
        assert_eq!(ball.vy, -6.0);
        assert_eq!(ball.position().y, 390.0 - 6.0);
    }

    #[test]
    fn trail_keeps_last_five_newest_first() {
        let cfg = PhysicsConfig::default();
        let mut ball = Ball::centered(COURT, &cfg);
        ball.vx = 1.0;
        for _ in 0..8 {
            ball.step(COURT);
        }
        let xs: Vec<f64> = ball.trail().map(|p| p.x).collect();
        assert_eq!(xs, vec![307.0, 306.0, 305.0, 304.0, 303.0]);
    }

    #[test]
    fn serve_vectors_stay_in_range() {
        let cfg = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let right = serve_vector(&cfg, &mut rng, false);
            assert_eq!(right.magnitude, 10.0);
            assert!(right.degrees.abs() <= 20.0);

            let left = serve_vector(&cfg, &mut rng, true);
            assert!((left.degrees - 180.0).abs() <= 20.0);
        }
    }

    #[test]
    fn negative_serve_limit_is_treated_as_magnitude() {
        let cfg = PhysicsConfig {
            max_serve_angle: -15.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            assert!(serve_vector(&cfg, &mut rng, false).degrees.abs() <= 15.0);
        }
    }

    #[test]
    fn served_ball_starts_at_center() {
        let cfg = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let ball = Ball::serve(COURT, &cfg, &mut rng, false);
        assert_eq!(ball.position(), Point::new(300.0, 200.0));
        assert!(ball.vx > 0.0);
        assert_eq!(ball.trail().count(), 0);
    }
}
