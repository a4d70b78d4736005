//! Drawing back-ends
//!
//! Renderers read the current particles and edges and paint them; they keep
//! no simulation state between frames. Two flavours exist:
//!
//! - `SceneRenderer` paints onto any [`Surface`] (canvas 2D, egui painter,
//!   or the `RecordingSurface` used by tests and the CLI).
//! - `StyleRenderer` writes per-particle element styles into a
//!   [`StyleSink`] (DOM nodes positioned with CSS percentages).

pub mod effects;
pub mod recording;
pub mod scene;
pub mod style;

#[cfg(feature = "egui")]
pub mod egui_surface;

pub use recording::{DrawCommand, RecordingSurface};
pub use scene::{Frame, SceneRenderer};
pub use style::{ElementStyle, StyleRenderer, StyleSink};

use crate::core::math::Vec2;
use crate::theme::Rgba;

/// Line style for strokes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba,
}

impl Stroke {
    pub const fn new(width: f32, color: Rgba) -> Self {
        Self { width, color }
    }
}

/// Minimal immediate-mode 2D drawing target, in surface units with the
/// origin at the top-left corner.
pub trait Surface {
    fn size(&self) -> Vec2;

    /// Reset the whole surface to `color` (transparent colours clear it).
    fn clear(&mut self, color: Rgba);

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke);

    /// Closed convex polygon.
    fn polygon(&mut self, points: &[Vec2], fill: Rgba, stroke: Option<Stroke>);

    /// Monospace text centred on `pos`.
    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Rgba);
}
