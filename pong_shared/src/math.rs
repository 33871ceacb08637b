//! Math types.
//!
//! This module intentionally stays small and deterministic.
//! Coordinates are screen-space: x grows right, y grows down.

use serde::{Deserialize, Serialize};

/// 2D point (usually a hitbox center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reflects the point across the court's vertical center line.
    pub fn mirrored(self, width: f64) -> Self {
        Self::new(mirror_x(width, self.x), self.y)
    }
}

/// Polar velocity, the form exchanged with the peer.
///
/// `degrees` follows the math convention (counter-clockwise, 0 = right)
/// while the screen's y axis points down, so a positive angle moves the
/// ball up the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vector {
    pub magnitude: f64,
    pub degrees: f64,
}

impl Vector {
    pub const ZERO: Self = Self {
        magnitude: 0.0,
        degrees: 0.0,
    };

    pub const fn new(magnitude: f64, degrees: f64) -> Self {
        Self { magnitude, degrees }
    }

    /// Mirrors the direction horizontally (`180 - degrees`).
    pub fn invert(self) -> Self {
        Self::new(self.magnitude, 180.0 - self.degrees)
    }

    /// Converts to a cartesian `(vx, vy)` pair in screen space.
    pub fn to_velocity(self) -> (f64, f64) {
        let theta = self.degrees.to_radians();
        (theta.cos() * self.magnitude, -theta.sin() * self.magnitude)
    }

    /// Builds a polar vector from a screen-space velocity.
    pub fn from_velocity(vx: f64, vy: f64) -> Self {
        Self::new(vx.hypot(vy), (-vy).atan2(vx).to_degrees())
    }
}

/// The cross-client coordinate transform. It is its own inverse.
pub fn mirror_x(width: f64, x: f64) -> f64 {
    width - x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn double_invert_is_identity() {
        for deg in [-170.0, -60.0, 0.0, 13.5, 90.0, 179.0, 240.0] {
            let v = Vector::new(15.0, deg);
            assert_eq!(v.invert().invert(), v);
        }
    }

    #[test]
    fn mirror_is_own_inverse() {
        for x in [0.0, 12.5, 300.0, 599.0] {
            assert_eq!(mirror_x(600.0, mirror_x(600.0, x)), x);
        }
    }

    #[test]
    fn positive_angle_moves_up_the_screen() {
        let (vx, vy) = Vector::new(10.0, 90.0).to_velocity();
        assert!(approx(vx, 0.0));
        assert!(approx(vy, -10.0));
    }

    #[test]
    fn velocity_roundtrip_keeps_direction() {
        let v = Vector::new(15.0, 150.0);
        let (vx, vy) = v.to_velocity();
        let back = Vector::from_velocity(vx, vy);
        assert!(approx(back.magnitude, 15.0));
        assert!(approx(back.degrees, 150.0));
    }
}
