//! Axis-aligned hitboxes.
//!
//! Positions are stored as the northwest corner; the public API speaks in
//! centers. All operations are total: no NaN or infinity guards.

use serde::{Deserialize, Serialize};

use crate::{config::Court, math::Point};

/// A side of a box, or of the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Axis-aligned rectangle with a fixed size.
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    pub nw_x: f64,
    pub nw_y: f64,
    width: f64,
    height: f64,
}

impl Hitbox {
    /// Creates a box centered on `(center_x, center_y)`.
    pub fn from_center(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            nw_x: center_x - width / 2.0,
            nw_y: center_y - height / 2.0,
            width,
            height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Center of the box.
    pub fn position(&self) -> Point {
        Point::new(self.nw_x + self.width / 2.0, self.nw_y + self.height / 2.0)
    }

    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.nw_x += dx;
        self.nw_y += dy;
    }

    /// Moves the box so its center is at `(center_x, center_y)`.
    pub fn set_position(&mut self, center_x: f64, center_y: f64) {
        self.nw_x = center_x - self.width / 2.0;
        self.nw_y = center_y - self.height / 2.0;
    }

    /// Strict overlap test; boxes that only share an edge do not collide.
    pub fn collides_with(&self, other: &Hitbox) -> bool {
        self.nw_x < other.nw_x + other.width
            && self.nw_x + self.width > other.nw_x
            && self.nw_y < other.nw_y + other.height
            && self.nw_y + self.height > other.nw_y
    }

    /// True when the box's edge on `side` is at or past the court boundary.
    pub fn hits_wall(&self, side: WallSide, court: Court) -> bool {
        match side {
            WallSide::Top => self.nw_y <= 0.0,
            WallSide::Bottom => self.nw_y + self.height >= court.height,
            WallSide::Left => self.nw_x <= 0.0,
            WallSide::Right => self.nw_x + self.width >= court.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COURT: Court = Court {
        width: 600.0,
        height: 400.0,
    };

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Hitbox::from_center(10.0, 10.0, 20.0, 20.0);
        let b = Hitbox::from_center(30.0, 10.0, 20.0, 20.0);
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Hitbox::from_center(10.0, 10.0, 20.0, 20.0);
        let b = Hitbox::from_center(29.0, 25.0, 20.0, 20.0);
        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));
    }

    #[test]
    fn walls_are_inclusive() {
        let mut b = Hitbox::from_center(10.0, 10.0, 20.0, 20.0);
        assert!(b.hits_wall(WallSide::Top, COURT));
        assert!(b.hits_wall(WallSide::Left, COURT));
        assert!(!b.hits_wall(WallSide::Bottom, COURT));

        b.set_position(590.0, 390.0);
        assert!(b.hits_wall(WallSide::Right, COURT));
        assert!(b.hits_wall(WallSide::Bottom, COURT));
        assert!(!b.hits_wall(WallSide::Top, COURT));
    }

    #[test]
    fn set_position_and_translate_move_the_corner() {
        let mut b = Hitbox::from_center(100.0, 100.0, 10.0, 80.0);
        assert_eq!((b.nw_x, b.nw_y), (95.0, 60.0));
        b.translate_by(5.0, -10.0);
        assert_eq!(b.position(), Point::new(105.0, 90.0));
        b.set_position(0.0, 0.0);
        assert_eq!((b.nw_x, b.nw_y), (-5.0, -40.0));
        assert_eq!((b.width(), b.height()), (10.0, 80.0));
    }
}
