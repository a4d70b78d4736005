//! Surface that records draw calls instead of painting pixels.
//!
//! Used by the headless runner and by renderer tests.

use super::{ElementStyle, StyleSink, Stroke, Surface};
use crate::core::math::Vec2;
use crate::theme::Rgba;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Line { from: Vec2, to: Vec2, stroke: Stroke },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeCircle { center: Vec2, radius: f32, stroke: Stroke },
    Polygon { points: Vec<Vec2>, fill: Rgba, stroke: Option<Stroke> },
    Text { pos: Vec2, text: String, size: f32, color: Rgba },
}

#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand out the recorded commands, leaving the surface empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, stroke });
    }

    fn polygon(&mut self, points: &[Vec2], fill: Rgba, stroke: Option<Stroke>) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            size,
            color,
        });
    }
}

/// Collects element styles by index, growing as needed.
impl StyleSink for Vec<ElementStyle> {
    fn apply(&mut self, index: usize, style: &ElementStyle) {
        if index >= self.len() {
            self.resize(index + 1, ElementStyle::default());
        }
        self[index] = *style;
    }
}
