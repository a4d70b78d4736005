//! DOM/CSS-style renderer
//!
//! Instead of painting, each drawn particle becomes an element style: a
//! position in percent of the container plus a pixel size and colour.
//! Hosts apply these to absolutely positioned elements.

use crate::core::config::FieldConfig;
use crate::core::math::Bounds;
use crate::core::particle::Particle;
use crate::theme::Rgba;

/// Style of one positioned element. `left`/`top` place the element's centre.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementStyle {
    pub left_percent: f32,
    pub top_percent: f32,
    /// Width and height in pixels.
    pub size: f32,
    pub color: Rgba,
}

impl ElementStyle {
    /// Inline CSS for the element.
    pub fn css(&self) -> String {
        format!(
            "left: {:.3}%; top: {:.3}%; width: {:.1}px; height: {:.1}px; background: {};",
            self.left_percent,
            self.top_percent,
            self.size,
            self.size,
            self.color.to_css()
        )
    }
}

/// Receives element styles, indexed by particle.
pub trait StyleSink {
    fn apply(&mut self, index: usize, style: &ElementStyle);
}

#[derive(Clone, Debug)]
pub struct StyleRenderer {
    colors: Vec<Rgba>,
    fallback: Rgba,
}

impl StyleRenderer {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            colors: config.palette.particles.clone(),
            fallback: config.palette.node,
        }
    }

    pub fn style_for(&self, p: &Particle, bounds: &Bounds) -> ElementStyle {
        ElementStyle {
            left_percent: p.position.x / bounds.width * 100.0,
            top_percent: p.position.y / bounds.height * 100.0,
            size: p.size,
            color: self.colors.get(p.color).copied().unwrap_or(self.fallback),
        }
    }

    /// Push the style of every drawn particle; index is the particle index.
    pub fn draw(&self, sink: &mut dyn StyleSink, particles: &[Particle], bounds: &Bounds) {
        for (i, p) in particles.iter().enumerate() {
            if p.kind.is_drawn() {
                sink.apply(i, &self.style_for(p, bounds));
            }
        }
    }
}
