//! Canvas-style scene renderer
//!
//! Paint order: background, edges (glow stroke, line, traveling dots on
//! hovered edges), then particles in array order. Hover state comes from
//! the particles' own `hovered` flags.

use super::effects::{self, EdgeEmphasis};
use super::{Stroke, Surface};
use crate::core::config::{FieldConfig, MotionConfig, Palette};
use crate::core::graph::Edge;
use crate::core::math::Vec2;
use crate::core::particle::{Particle, ParticleKind, ParticleShape};
use crate::theme::{colors, Rgba};

/// Extra radius of a hovered node over its resting radius.
const HOVER_GROWTH: f32 = 10.0;

/// Everything one draw call reads.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub particles: &'a [Particle],
    pub edges: &'a [Edge],
    /// Wall-clock seconds, drives pulses and traveling dots.
    pub time: f64,
}

/// Styling taken from the config; holds no per-frame state.
#[derive(Clone, Debug)]
pub struct SceneRenderer {
    palette: Palette,
    /// Edge length at which a connection fades out completely.
    threshold: f32,
    fade_out_distance: f32,
}

impl SceneRenderer {
    pub fn new(config: &FieldConfig) -> Self {
        let fade_out_distance = match &config.motion {
            MotionConfig::Flow(flow) => flow.fade_out_distance,
            _ => 0.0,
        };
        Self {
            palette: config.palette.clone(),
            threshold: config.connections.map_or(0.0, |c| c.threshold),
            fade_out_distance,
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        surface.clear(self.palette.background);

        for edge in frame.edges {
            self.draw_edge(surface, frame, edge);
        }

        for (i, p) in frame.particles.iter().enumerate() {
            if !p.kind.is_drawn() {
                continue;
            }
            match p.shape {
                ParticleShape::Disc if p.kind == ParticleKind::Interactive => {
                    self.draw_node(surface, p, frame.time)
                }
                ParticleShape::Disc => {
                    surface.fill_circle(p.position, p.size * 0.5, self.particle_color(p))
                }
                ParticleShape::Glyph(c) => self.draw_glyph(surface, p, c),
                ParticleShape::Card => self.draw_card(surface, p, i),
            }
        }
    }

    fn particle_color(&self, p: &Particle) -> Rgba {
        self.palette
            .particles
            .get(p.color)
            .copied()
            .unwrap_or(self.palette.node)
    }

    fn draw_edge(&self, surface: &mut dyn Surface, frame: &Frame<'_>, edge: &Edge) {
        let (Some(a), Some(b)) = (frame.particles.get(edge.a), frame.particles.get(edge.b)) else {
            return;
        };

        let hovered = a.hovered || b.hovered;
        let emphasis = if hovered {
            EdgeEmphasis::Hovered
        } else if a.kind == ParticleKind::Interactive && b.kind == ParticleKind::Interactive {
            EdgeEmphasis::Interactive
        } else {
            EdgeEmphasis::Plain
        };
        let avg_layer = (a.layer as f32 + b.layer as f32) * 0.5;
        let (opacity, width) =
            effects::edge_style(a.position.distance(b.position), self.threshold, avg_layer, emphasis);
        if opacity <= 0.0 {
            return;
        }

        let color = if hovered {
            self.palette.edge_highlight
        } else {
            self.palette.edge
        };

        // Soft halo under the line
        let glow = Stroke::new(width + 3.0 + avg_layer * 2.0, color.with_alpha(opacity * 0.25));
        surface.line(a.position, b.position, glow);
        surface.line(a.position, b.position, Stroke::new(width, color.with_alpha(opacity)));

        if hovered {
            let dot_radius = 3.0 + avg_layer * 0.5;
            for progress in effects::dot_progress(frame.time) {
                let at = a.position.lerp(b.position, progress);
                let alpha = effects::dot_opacity(progress);
                surface.fill_circle(at, dot_radius + 4.0, color.with_alpha(alpha * 0.3));
                surface.fill_circle(at, dot_radius, color.with_alpha(alpha));
            }
        }
    }

    fn draw_node(&self, surface: &mut dyn Surface, p: &Particle, time: f64) {
        let layer = p.layer as f32;
        let base_radius = p.size * 0.5 + layer * 2.0;
        let layer_opacity = 0.7 + layer * 0.1;
        let node = self.palette.node;

        if p.hovered {
            let radius = base_radius + HOVER_GROWTH;
            surface.fill_circle(p.position, radius + 15.0, node.with_alpha(0.2));
            surface.fill_circle(p.position, radius, node.with_alpha(0.3));
            surface.fill_circle(p.position, radius * 0.6, node.with_alpha(0.9));

            for ring in effects::pulse_rings(radius, time) {
                surface.stroke_circle(
                    p.position,
                    ring.radius,
                    Stroke::new(ring.width, node.with_alpha(ring.opacity)),
                );
            }
        } else {
            let radius = base_radius;
            let shadow = radius + 5.0 + layer * 2.5;
            surface.fill_circle(
                p.position + Vec2::splat(2.0),
                shadow,
                node.with_alpha(0.15 * layer_opacity),
            );
            surface.fill_circle(p.position, radius, node.with_alpha(0.8 * layer_opacity));
            surface.fill_circle(
                p.position - Vec2::splat(radius * 0.3),
                radius * 0.4,
                colors::HIGHLIGHT.with_alpha(0.15 * layer_opacity),
            );
        }
    }

    fn flow_opacity(&self, p: &Particle) -> f32 {
        p.flow()
            .map_or(1.0, |trip| effects::flow_opacity(p, trip, self.fade_out_distance))
    }

    fn draw_glyph(&self, surface: &mut dyn Surface, p: &Particle, c: char) {
        let opacity = self.flow_opacity(p);
        if opacity <= 0.0 {
            return;
        }
        let mut buf = [0u8; 4];
        surface.text(
            p.position,
            c.encode_utf8(&mut buf),
            p.size,
            self.particle_color(p).with_alpha(opacity),
        );
    }

    /// Rotated photo card with a slightly uneven outline.
    fn draw_card(&self, surface: &mut dyn Surface, p: &Particle, index: usize) {
        let opacity = self.flow_opacity(p);
        if opacity <= 0.0 {
            return;
        }
        let color = self.particle_color(p);
        let (w, h) = (p.size, p.size * 1.2);
        let generation = p.flow().map_or(0, |f| f.generation);
        let (sin, cos) = p.rotation.sin_cos();
        let place = |local: Vec2| p.position + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);

        let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];
        let outline: Vec<Vec2> = corners
            .iter()
            .enumerate()
            .map(|(k, &(cx, cy))| {
                let jitter = Vec2::new(wobble(index, generation, 2 * k), wobble(index, generation, 2 * k + 1));
                place(Vec2::new(cx * w, cy * h) + jitter)
            })
            .collect();
        surface.polygon(
            &outline,
            color.with_alpha(opacity * 0.3),
            Some(Stroke::new(1.0, color.with_alpha(opacity))),
        );

        let border = w * 0.12;
        let bottom = h * 0.25;
        let (x0, y0) = (-w * 0.5 + border, -h * 0.5 + border);
        let (x1, y1) = (w * 0.5 - border, h * 0.5 - bottom);
        let photo = [
            place(Vec2::new(x0, y0)),
            place(Vec2::new(x1, y0)),
            place(Vec2::new(x1, y1)),
            place(Vec2::new(x0, y1)),
        ];
        surface.polygon(&photo, colors::HIGHLIGHT.with_alpha(opacity), None);
    }
}

/// Stable pseudo-random offset in `[0, 1)` per card, trip, and corner.
fn wobble(index: usize, generation: u32, corner: usize) -> f32 {
    let seed = index as f32 * 12.9898 + generation as f32 * 78.233 + corner as f32 * 37.719;
    (seed.sin() * 43_758.547).fract().abs()
}
