//! `pong_client`
//!
//! Client-side systems for relay-mediated two-player pong:
//! - Match session and lifecycle (waiting, start, serve, playing, over)
//! - Local simulation with the split paddle authority
//! - Reconciliation of peer messages into the mirrored court
//! - Held-key input driven by console commands
//! - Frame drawing through a render backend
//! - Single-player mode against a computer paddle

pub mod client;
pub mod console;
pub mod draw;
pub mod input;
pub mod profile;
pub mod reconcile;
pub mod session;
pub mod sim;
pub mod solo;

pub use client::PongClient;
pub use session::Session;
