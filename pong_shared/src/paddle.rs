//! Paddles.
//!
//! Each view has its own paddle on the right and the opponent's on the
//! left. Paddles are created once per match and only repositioned between
//! rallies.

use serde::{Deserialize, Serialize};

use crate::{
    config::Court,
    hitbox::{Hitbox, WallSide},
    physics::PhysicsConfig,
};

/// Which paddle this is, from the local view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleSide {
    /// Locally controlled, right side.
    Player,
    /// Remote mirror (or computer), left side.
    Opponent,
}

#[derive(Debug, Clone)]
pub struct Paddle {
    pub hitbox: Hitbox,
    pub side: PaddleSide,
    vy: f64,
}

impl Paddle {
    pub fn new(side: PaddleSide, court: Court, cfg: &PhysicsConfig) -> Self {
        let x = match side {
            PaddleSide::Player => court.width * 9.0 / 10.0,
            PaddleSide::Opponent => court.width / 10.0,
        };
        Self {
            hitbox: Hitbox::from_center(x, court.center_y(), cfg.paddle_width, cfg.paddle_height),
            side,
            vy: 0.0,
        }
    }

    pub fn is_player(&self) -> bool {
        self.side == PaddleSide::Player
    }

    pub fn speed(&self) -> f64 {
        self.vy
    }

    /// Sets the vertical speed; returns whether it changed.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        let changed = self.vy != speed;
        self.vy = speed;
        changed
    }

    pub fn center_y(&self) -> f64 {
        self.hitbox.position().y
    }

    /// Moves the paddle vertically, keeping its x.
    pub fn set_y(&mut self, y: f64) {
        let x = self.hitbox.position().x;
        self.hitbox.set_position(x, y);
    }

    pub fn reset_position(&mut self, court: Court) {
        self.set_y(court.center_y());
    }

    /// Advances one tick. A paddle is clamped flush to a wall only while it
    /// keeps moving into it, so a paddle inside a wall may still leave.
    pub fn step(&mut self, court: Court) {
        let half = self.hitbox.height() / 2.0;
        if self.hitbox.hits_wall(WallSide::Top, court) && self.vy < 0.0 {
            self.set_y(half);
        } else if self.hitbox.hits_wall(WallSide::Bottom, court) && self.vy > 0.0 {
            self.set_y(court.height - half);
        } else {
            self.hitbox.translate_by(0.0, self.vy);
        }
    }
}
