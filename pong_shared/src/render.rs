//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend.
//! It defines the draw primitives a canvas implementation would satisfy.

use serde::{Deserialize, Serialize};

/// RGBA color, alpha 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A minimal 2D canvas API. Text is centered on `(x, y)`.
pub trait RenderBackend {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, color: Color);
    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Color);
}

/// A no-op renderer useful for headless clients.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64, _color: Color) {}
    fn fill_circle(&mut self, _x: f64, _y: f64, _radius: f64, _color: Color) {}
    fn line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, _thickness: f64, _color: Color) {}
    fn text(&mut self, _text: &str, _x: f64, _y: f64, _size: f64, _color: Color) {}
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        thickness: f64,
        color: Color,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        color: Color,
    },
}

/// Records draw calls instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingRenderer {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        self.commands
            .push(DrawCommand::FillCircle { x, y, radius, color });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            from: (x1, y1),
            to: (x2, y2),
            thickness,
            color,
        });
    }

    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }
}
