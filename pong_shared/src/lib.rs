//! `pong_shared`
//!
//! Libraries shared by the Pong client and its tests.
//!
//! Design goals:
//! - Deterministic kinematics with no hidden global state.
//! - Entities compose a `Hitbox` instead of extending it.
//! - One explicit wire enum for everything exchanged with the relay.
//! - No `unsafe`.

pub mod ball;
pub mod config;
pub mod event;
pub mod hitbox;
pub mod math;
pub mod net;
pub mod paddle;
pub mod physics;
pub mod render;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::ball::*;
    pub use crate::config::*;
    pub use crate::event::*;
    pub use crate::hitbox::*;
    pub use crate::math::*;
    pub use crate::net::*;
    pub use crate::paddle::*;
    pub use crate::physics::*;
}
