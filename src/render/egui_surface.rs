//! [`Surface`] over an `egui::Painter`, for embedding the field in an egui app.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape};

use super::{Stroke, Surface};
use crate::core::math::Vec2;
use crate::theme::Rgba;

/// Paints into `rect` of an egui painter; field coordinates are offsets
/// from `rect.min`.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    #[inline]
    fn pos(&self, p: Vec2) -> Pos2 {
        Pos2::new(self.rect.min.x + p.x, self.rect.min.y + p.y)
    }
}

#[inline]
fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.alpha_u8())
}

#[inline]
fn stroke(s: Stroke) -> egui::Stroke {
    egui::Stroke::new(s.width, color32(s.color))
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> Vec2 {
        Vec2::new(self.rect.width(), self.rect.height())
    }

    fn clear(&mut self, color: Rgba) {
        if color.a > 0.0 {
            self.painter.rect_filled(self.rect, 0.0, color32(color));
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, s: Stroke) {
        self.painter.line_segment([self.pos(from), self.pos(to)], stroke(s));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter.circle_filled(self.pos(center), radius, color32(color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, s: Stroke) {
        self.painter.circle_stroke(self.pos(center), radius, stroke(s));
    }

    fn polygon(&mut self, points: &[Vec2], fill: Rgba, s: Option<Stroke>) {
        let points: Vec<Pos2> = points.iter().map(|&p| self.pos(p)).collect();
        let outline = s.map_or(egui::Stroke::NONE, stroke);
        self.painter.add(Shape::convex_polygon(points, color32(fill), outline));
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Rgba) {
        self.painter.text(
            self.pos(pos),
            Align2::CENTER_CENTER,
            text,
            FontId::monospace(size),
            color32(color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{FieldConfig, Preset};
    use crate::core::field::ParticleField;
    use crate::render::{Frame, SceneRenderer};

    #[test]
    fn test_scene_paints_into_egui_layer() {
        let mut config = FieldConfig::preset(Preset::Stream);
        config.seed = Some(1);
        let mut field = ParticleField::new(&config);
        for _ in 0..60 {
            field.step();
        }
        let renderer = SceneRenderer::new(field.config());

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), egui::vec2(800.0, 600.0));
            let mut surface = EguiSurface::new(&painter, rect);
            assert_eq!(surface.size(), Vec2::new(800.0, 600.0));
            renderer.draw(&mut surface, &Frame { particles: field.particles(), edges: &[], time: 1.0 });
        });

        assert!(!output.shapes.is_empty());
    }

    #[test]
    fn test_color_conversion() {
        let c = color32(Rgba::rgba(39, 56, 109, 1.0));
        assert_eq!(c, Color32::from_rgb(39, 56, 109));
        assert_eq!(color32(Rgba::rgba(1, 2, 3, 0.0)).a(), 0);
    }
}
