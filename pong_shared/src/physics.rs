//! Physics parameters and paddle bounce geometry.

use serde::{Deserialize, Serialize};

/// Physics parameters. Distances are pixels, speeds are pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub ball_size: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub max_paddle_speed: f64,
    /// Steepest paddle bounce, reached on an edge hit.
    pub max_bounce_angle: f64,
    /// Serve angles are drawn from `[-max, max]`.
    pub max_serve_angle: f64,
    /// Ball speed after a paddle bounce.
    pub ball_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_size: 20.0,
            paddle_width: 10.0,
            paddle_height: 80.0,
            max_paddle_speed: 10.0,
            max_bounce_angle: 60.0,
            max_serve_angle: 20.0,
            ball_speed: 15.0,
        }
    }
}

impl PhysicsConfig {
    /// Serves start slower than rallies.
    pub fn serve_speed(&self) -> f64 {
        self.ball_speed * 2.0 / 3.0
    }
}

/// Deflection for a hit `offset` pixels from the paddle center, where
/// `offset = paddle.y - ball.y`.
///
/// Linear in the offset and saturating at `±max_bounce_angle` once the
/// offset reaches half the paddle height.
pub fn deflection_degrees(offset: f64, cfg: &PhysicsConfig) -> f64 {
    let half = cfg.paddle_height / 2.0;
    offset.clamp(-half, half) * cfg.max_bounce_angle / half
}

/// Outgoing angle for a ball leaving the right-hand (player) paddle.
pub fn bounce_degrees(offset: f64, cfg: &PhysicsConfig) -> f64 {
    180.0 - deflection_degrees(offset, cfg)
}
