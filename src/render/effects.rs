//! Time- and distance-driven curves shared by the renderers.
//!
//! All functions are pure; `t` is wall-clock seconds.

use std::f32::consts::TAU;

use crate::core::math::smoothstep;
use crate::core::particle::{Flow, Particle};

/// Traveling dots per hovered edge.
pub const DOTS_PER_EDGE: usize = 3;

/// Seconds for one dot to cross an edge.
pub const DOT_PERIOD: f64 = 1.2;

/// Pulse phase advance per second.
pub const PULSE_RATE: f64 = 2.5;

/// Opacity of a flow particle: eased ramp-in over the first part of the
/// trip, linear ramp-out over the last `fade_out_distance` units.
///
/// Ramp-in progress is the vertical descent from the origin, not the path
/// length.
pub fn flow_opacity(p: &Particle, trip: &Flow, fade_out_distance: f32) -> f32 {
    let traveled = (p.position.y - trip.origin.y).max(0.0);
    let fade_in = if trip.fade_distance > f32::EPSILON {
        smoothstep(traveled / trip.fade_distance)
    } else {
        1.0
    };

    let remaining = p.position.distance(trip.target);
    let fade_out = if fade_out_distance > f32::EPSILON {
        (remaining / fade_out_distance).min(1.0)
    } else {
        1.0
    };

    fade_in * fade_out
}

/// Progress (`0..1`) of each traveling dot along its edge.
pub fn dot_progress(t: f64) -> [f32; DOTS_PER_EDGE] {
    std::array::from_fn(|k| {
        let p = t / DOT_PERIOD + k as f64 / DOTS_PER_EDGE as f64;
        p.rem_euclid(1.0) as f32
    })
}

/// Dots are brightest mid-edge.
#[inline]
pub fn dot_opacity(progress: f32) -> f32 {
    (0.9 * (1.0 - (progress - 0.5).abs() * 1.5)).max(0.0)
}

/// Pulse ring around a hovered node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    pub radius: f32,
    pub opacity: f32,
    pub width: f32,
}

/// The two rings drawn around a hovered node of radius `hover_radius`.
pub fn pulse_rings(hover_radius: f32, t: f64) -> [Ring; 2] {
    let phase = ((t * PULSE_RATE) % TAU as f64) as f32;
    let (s0, s1) = (phase.sin(), (phase + 1.0).sin());
    [
        Ring {
            radius: hover_radius + 10.0 + s0 * 6.0,
            opacity: 0.4 + s0 * 0.2,
            width: 2.5,
        },
        Ring {
            radius: hover_radius + 18.0 + s1 * 4.0,
            opacity: 0.2 + s1 * 0.1,
            width: 1.5,
        },
    ]
}

/// How an edge is emphasised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
    Plain,
    /// Both endpoints are interactive nodes.
    Interactive,
    /// An endpoint is hovered.
    Hovered,
}

/// Opacity and width of an edge of length `dist`.
pub fn edge_style(dist: f32, threshold: f32, avg_layer: f32, emphasis: EdgeEmphasis) -> (f32, f32) {
    let closeness = if threshold > f32::EPSILON {
        (1.0 - dist / threshold).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let depth = 0.4 + avg_layer * 0.3;

    match emphasis {
        EdgeEmphasis::Plain => (closeness * 0.45 * depth, 2.0 + avg_layer * 0.8),
        EdgeEmphasis::Interactive => (closeness * 0.6 * depth, 2.5 + avg_layer * 0.6),
        EdgeEmphasis::Hovered => (closeness * 0.95, 4.0 + avg_layer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Vec2;
    use crate::core::particle::{Anchor, ParticleKind};

    fn trip_particle() -> (Particle, Flow) {
        let trip = Flow {
            origin: Vec2::new(0.0, 0.0),
            target: Vec2::new(0.0, 500.0),
            speed: 0.5,
            fade_distance: 350.0,
            generation: 0,
        };
        let mut p = Particle::new(trip.origin, ParticleKind::Ambient);
        p.anchor = Anchor::Flow(trip);
        (p, trip)
    }

    #[test]
    fn test_flow_opacity_ramps() {
        let (mut p, trip) = trip_particle();
        assert_eq!(flow_opacity(&p, &trip, 80.0), 0.0);

        p.position = Vec2::new(0.0, 175.0);
        assert!((flow_opacity(&p, &trip, 80.0) - 0.5).abs() < 1e-5);

        p.position = Vec2::new(0.0, 400.0);
        assert_eq!(flow_opacity(&p, &trip, 80.0), 1.0);

        p.position = Vec2::new(0.0, 460.0);
        assert!((flow_opacity(&p, &trip, 80.0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_fade_in_follows_descent() {
        let trip = Flow {
            origin: Vec2::new(0.0, 0.0),
            target: Vec2::new(300.0, 400.0),
            speed: 0.5,
            fade_distance: 350.0,
            generation: 0,
        };
        let mut p = Particle::new(Vec2::new(150.0, 175.0), ParticleKind::Ambient);
        p.anchor = Anchor::Flow(trip);

        // 175 down of a 350 ramp, although the path covered is ~230
        assert!((flow_opacity(&p, &trip, 0.0) - 0.5).abs() < 1e-5);

        // Sideways drift alone does not fade in
        p.position = Vec2::new(120.0, 0.0);
        assert_eq!(flow_opacity(&p, &trip, 0.0), 0.0);
    }

    #[test]
    fn test_dot_progress_wraps() {
        let dots = dot_progress(0.0);
        assert_eq!(dots[0], 0.0);
        assert!((dots[1] - 1.0 / 3.0).abs() < 1e-6);

        for t in [0.3, 1.2, 17.95, 1.0e6] {
            for p in dot_progress(t) {
                assert!((0.0..1.0).contains(&p));
                assert!(dot_opacity(p) > 0.0);
            }
        }
        assert!((dot_opacity(0.5) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_rings_stay_outside_node() {
        for i in 0..200 {
            let rings = pulse_rings(22.0, i as f64 * 0.05);
            assert!(rings[0].radius >= 26.0 && rings[0].radius <= 38.0);
            assert!(rings[1].radius >= 36.0 && rings[1].radius <= 44.0);
            assert!(rings.iter().all(|r| r.opacity >= 0.0));
        }
    }

    #[test]
    fn test_edge_style_emphasis() {
        let (plain, w_plain) = edge_style(175.0, 350.0, 1.0, EdgeEmphasis::Plain);
        assert!((plain - 0.5 * 0.45 * 0.7).abs() < 1e-6);
        assert!((w_plain - 2.8).abs() < 1e-6);

        let (hot, w_hot) = edge_style(175.0, 350.0, 1.0, EdgeEmphasis::Hovered);
        assert!(hot > plain && w_hot > w_plain);

        let (far, _) = edge_style(400.0, 350.0, 0.0, EdgeEmphasis::Interactive);
        assert_eq!(far, 0.0);
    }
}
