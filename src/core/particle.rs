//! Particle records
//!
//! Plain data only: the systems in `field`, `graph`, `hover` and the
//! renderers operate over `&[Particle]` / `&mut [Particle]`.

use super::math::Vec2;

/// Role of a particle in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Drawn and hoverable (network data nodes).
    Interactive,
    /// Takes part in physics and the proximity graph, never drawn or hovered.
    Helper,
    /// Drawn, never hovered (stream glyphs, pellets).
    Ambient,
}

impl ParticleKind {
    #[inline]
    pub fn is_drawn(&self) -> bool {
        !matches!(self, ParticleKind::Helper)
    }

    #[inline]
    pub fn is_hoverable(&self) -> bool {
        matches!(self, ParticleKind::Interactive)
    }
}

/// What the canvas renderer paints for a particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleShape {
    Disc,
    Glyph(char),
    /// Hand-drawn photo card, `size` wide and `1.2 * size` tall.
    Card,
}

/// Circular orbit around a shared centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub center: Vec2,
    pub radius: f32,
    pub angle: f32,
    /// Radians per frame.
    pub speed: f32,
    pub wobble_phase: f32,
}

impl Orbit {
    /// Orbit through `position` around `center`.
    pub fn through(center: Vec2, position: Vec2, speed: f32, wobble_phase: f32) -> Self {
        let rel = position - center;
        Self {
            center,
            radius: rel.length(),
            angle: rel.y.atan2(rel.x),
            speed,
            wobble_phase,
        }
    }

    /// Point on the circle at the current angle.
    #[inline]
    pub fn point(&self) -> Vec2 {
        self.center + Vec2::new(self.angle.cos(), self.angle.sin()) * self.radius
    }
}

/// One trip of a flow particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flow {
    pub origin: Vec2,
    pub target: Vec2,
    /// Units per frame.
    pub speed: f32,
    /// Journey length over which opacity ramps in.
    pub fade_distance: f32,
    /// Respawn counter, bumped on every new trip.
    pub generation: u32,
}

impl Flow {
    #[inline]
    pub fn journey(&self) -> f32 {
        self.origin.distance(self.target)
    }
}

/// Reference point a particle is pulled toward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    Free,
    Orbit(Orbit),
    Flow(Flow),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub anchor: Anchor,
    /// Diameter for discs/pellets, font size for glyphs, width for cards.
    pub size: f32,
    /// Depth tier (0 = back) scaling radius and opacity.
    pub layer: u8,
    pub kind: ParticleKind,
    pub shape: ParticleShape,
    /// Index into the palette's particle colours.
    pub color: usize,
    pub rotation: f32,
    /// Rotation advance per frame.
    pub spin: f32,
    /// Set by pointer hit-testing; never persisted.
    pub hovered: bool,
}

impl Particle {
    pub fn new(position: Vec2, kind: ParticleKind) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            anchor: Anchor::Free,
            size: 12.0,
            layer: 0,
            kind,
            shape: ParticleShape::Disc,
            color: 0,
            rotation: 0.0,
            spin: 0.0,
            hovered: false,
        }
    }

    #[inline]
    pub fn flow(&self) -> Option<&Flow> {
        match &self.anchor {
            Anchor::Flow(flow) => Some(flow),
            _ => None,
        }
    }

    #[inline]
    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.anchor {
            Anchor::Orbit(orbit) => Some(orbit),
            _ => None,
        }
    }

    /// Distance left to the flow destination, `None` for non-flow particles.
    #[inline]
    pub fn distance_to_target(&self) -> Option<f32> {
        self.flow().map(|f| self.position.distance(f.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_through_point() {
        let center = Vec2::new(100.0, 100.0);
        let orbit = Orbit::through(center, Vec2::new(100.0, 160.0), 0.001, 0.0);

        assert!((orbit.radius - 60.0).abs() < 1e-4);
        assert!((orbit.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(orbit.point().distance(Vec2::new(100.0, 160.0)) < 1e-3);
    }

    #[test]
    fn test_kind_flags() {
        assert!(ParticleKind::Interactive.is_drawn());
        assert!(ParticleKind::Interactive.is_hoverable());
        assert!(!ParticleKind::Helper.is_drawn());
        assert!(!ParticleKind::Helper.is_hoverable());
        assert!(ParticleKind::Ambient.is_drawn());
        assert!(!ParticleKind::Ambient.is_hoverable());
    }

    #[test]
    fn test_distance_to_target() {
        let mut p = Particle::new(Vec2::new(0.0, 0.0), ParticleKind::Ambient);
        assert_eq!(p.distance_to_target(), None);

        p.anchor = Anchor::Flow(Flow {
            origin: Vec2::new(0.0, -10.0),
            target: Vec2::new(3.0, 4.0),
            speed: 1.0,
            fade_distance: 10.0,
            generation: 0,
        });
        assert_eq!(p.distance_to_target(), Some(5.0));
    }
}
