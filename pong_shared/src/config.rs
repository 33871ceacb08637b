//! Configuration system.
//!
//! Loads client configuration from JSON strings/files. Every field has a
//! default so partial files are accepted.

use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::physics::PhysicsConfig;

/// Court (canvas) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub width: f64,
    pub height: f64,
}

impl Court {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

impl Default for Court {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

/// Root configuration for a Pong client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Relay address, e.g. `127.0.0.1:40000`.
    pub relay_addr: String,
    /// Display name sent with `login`.
    pub player_name: String,
    pub court: Court,
    /// Fixed physics tick rate.
    pub tick_hz: u32,
    /// Render frame rate driving the frame callback.
    pub frame_hz: u32,
    /// Interval of the paddle position heartbeat.
    pub heartbeat_ms: u64,
    /// Pause between a serve and play resuming.
    pub serve_delay_ms: u64,
    pub points_to_win: u32,
    /// Seeds serve angles; random when absent.
    pub seed: Option<u64>,
    pub physics: PhysicsConfig,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            relay_addr: "127.0.0.1:40000".to_string(),
            player_name: "Unnamed".to_string(),
            court: Court::default(),
            tick_hz: 60,
            frame_hz: 60,
            heartbeat_ms: 25,
            serve_delay_ms: 750,
            points_to_win: 7,
            seed: None,
            physics: PhysicsConfig::default(),
        }
    }
}

impl PongConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg = Self::from_json_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(cfg)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz.max(1) as f64)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_hz.max(1) as f64)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms.max(1))
    }

    pub fn serve_delay(&self) -> Duration {
        Duration::from_millis(self.serve_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = PongConfig::from_json_str(r#"{ "player_name": "ada", "seed": 7 }"#).unwrap();
        assert_eq!(cfg.player_name, "ada");
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.tick_hz, 60);
        assert_eq!(cfg.heartbeat_ms, 25);
        assert_eq!(cfg.court, Court::new(600.0, 400.0));
        assert_eq!(cfg.physics.paddle_height, 80.0);
    }

    #[test]
    fn tick_interval_is_sixtieth_of_a_second() {
        let cfg = PongConfig::default();
        let ms = cfg.tick_interval().as_secs_f64() * 1000.0;
        assert!((ms - 1000.0 / 60.0).abs() < 1e-6);
    }
}
