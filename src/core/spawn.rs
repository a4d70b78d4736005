//! Initial layouts and flow respawning.
//!
//! Every random draw takes the field's `FieldRng`, so a seeded field lays
//! out and respawns identically on every run.

use std::f32::consts::TAU;

use super::config::{DriftConfig, FieldConfig, FlowConfig, MotionConfig, OrbitConfig};
use super::math::{Bounds, FieldRng, Vec2};
use super::particle::{Anchor, Flow, Orbit, Particle, ParticleKind, ParticleShape};

/// Number of depth tiers used by the ring layout.
pub const LAYERS: u8 = 3;

/// Build the particle set for a (sanitized) config.
pub fn populate(config: &FieldConfig, rng: &mut FieldRng) -> Vec<Particle> {
    match &config.motion {
        MotionConfig::Orbit(orbit) => ring_layout(config, orbit, rng),
        MotionConfig::Flow(flow) => flow_layout(config, flow, rng),
        MotionConfig::Drift(drift) => scatter_layout(config, drift, rng),
    }
}

fn kind_for(index: usize, config: &FieldConfig, fallback: ParticleKind) -> ParticleKind {
    if index < config.interactive_count {
        ParticleKind::Interactive
    } else {
        fallback
    }
}

/// Interactive nodes evenly on a ring, helpers scattered through the disc.
fn ring_layout(config: &FieldConfig, orbit: &OrbitConfig, rng: &mut FieldRng) -> Vec<Particle> {
    let center = config.bounds.center();
    let max_radius = config.bounds.min_edge() * orbit.radius_fraction;
    let ring_count = config.interactive_count.max(1) as f32;

    (0..config.particle_count)
        .map(|i| {
            let kind = kind_for(i, config, ParticleKind::Helper);

            let (angle, layer, radius) = if kind == ParticleKind::Interactive {
                let layer = (i % LAYERS as usize) as u8;
                let radius = max_radius * 0.7
                    + layer as f32 * max_radius * 0.1
                    + rng.centered() * max_radius * 0.15;
                (i as f32 / ring_count * TAU, layer, radius)
            } else {
                let angle = rng.angle();
                let layer = rng.index(LAYERS as usize) as u8;
                (angle, layer, max_radius * 0.3 + rng.unit() * max_radius * 0.7)
            };

            let position = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            let base_speed = if kind == ParticleKind::Interactive {
                orbit.interactive_speed
            } else {
                orbit.helper_speed
            };
            let speed = rng.centered() * orbit.speed_jitter + base_speed;
            let wobble_phase = if orbit.wobble.is_some() { rng.angle() } else { 0.0 };

            let mut p = Particle::new(position, kind);
            p.velocity = Vec2::new(rng.centered(), rng.centered()) * orbit.initial_speed;
            p.anchor = Anchor::Orbit(Orbit::through(center, position, speed, wobble_phase));
            p.layer = layer;
            p.size = rng.range(config.particle_size[0], config.particle_size[1]);
            p.color = rng.index(config.palette.particles.len());
            p
        })
        .collect()
}

/// Uniform over the width and over the vertical band.
fn scatter_layout(config: &FieldConfig, drift: &DriftConfig, rng: &mut FieldRng) -> Vec<Particle> {
    let Bounds { width, height } = config.bounds;
    let [top, bottom] = config.boundary.band.unwrap_or([0.0, 1.0]);

    (0..config.particle_count)
        .map(|i| {
            let position = Vec2::new(
                rng.unit() * width,
                (top + rng.unit() * (bottom - top)) * height,
            );
            let mut p = Particle::new(position, kind_for(i, config, ParticleKind::Ambient));
            p.size = rng.range(config.particle_size[0], config.particle_size[1]);
            p.velocity = Vec2::new(
                rng.centered() * drift.initial_speed[0],
                rng.centered() * drift.initial_speed[1],
            );
            p.color = rng.index(config.palette.particles.len());
            p
        })
        .collect()
}

/// Cards first (drawn behind), glyphs after, each on a fresh trip.
fn flow_layout(config: &FieldConfig, flow: &FlowConfig, rng: &mut FieldRng) -> Vec<Particle> {
    let anchor = flow_anchor(&config.bounds, flow);
    let glyphs: Vec<char> = flow.glyphs.chars().collect();

    (0..config.particle_count)
        .map(|i| {
            let mut p = Particle::new(anchor, kind_for(i, config, ParticleKind::Ambient));
            if i < flow.card_count {
                p.shape = ParticleShape::Card;
                p.rotation = rng.angle();
                p.spin = rng.centered() * flow.spin;
            } else {
                p.shape = match glyphs.get(rng.index(glyphs.len())) {
                    Some(&c) => ParticleShape::Glyph(c),
                    None => ParticleShape::Disc,
                };
            }
            p.color = rng.index(config.palette.particles.len());
            respawn(&mut p, flow, config.particle_size, anchor, rng);
            p
        })
        .collect()
}

/// Destination centre of the flow variant.
#[inline]
pub fn flow_anchor(bounds: &Bounds, flow: &FlowConfig) -> Vec2 {
    bounds.center() + Vec2::from(flow.anchor_offset)
}

/// Start a new trip: origin in a cone above `anchor`, destination jittered
/// around it. Re-randomizes size and speed; bumps the generation.
///
/// `glyph_size` is the size range of non-card particles; cards use the
/// flow's own size, speed and jitter ranges.
pub fn respawn(
    p: &mut Particle,
    flow: &FlowConfig,
    glyph_size: [f32; 2],
    anchor: Vec2,
    rng: &mut FieldRng,
) {
    let card = p.shape == ParticleShape::Card;
    let (size, speed_range, jitter) = if card {
        (flow.card_size, flow.card_speed, flow.card_target_jitter)
    } else {
        (glyph_size, flow.speed, flow.target_jitter)
    };

    // Tilt within the cone, then spin the tilt around the vertical axis
    let tilt = rng.centered() * 2.0 * flow.cone_half_angle;
    let distance = rng.range(flow.spawn_distance[0], flow.spawn_distance[1]);
    let horizontal = tilt.tan() * distance;
    let azimuth = rng.angle();

    let mut origin = anchor + Vec2::new(azimuth.cos() * horizontal, -distance);
    let target = anchor + Vec2::new(rng.centered() * jitter[0], rng.centered() * jitter[1]);

    if origin.distance(target) <= flow.arrive_epsilon {
        origin = target - Vec2::Y * flow.arrive_epsilon * 2.0;
    }

    let speed = rng.range(speed_range[0], speed_range[1]);
    let generation = p.flow().map_or(0, |f| f.generation.wrapping_add(1));
    let journey = origin.distance(target);

    p.position = origin;
    p.velocity = Vec2::ZERO;
    p.size = rng.range(size[0], size[1]);
    p.anchor = Anchor::Flow(Flow {
        origin,
        target,
        speed,
        fade_distance: journey * flow.fade_in_fraction,
        generation,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Preset;

    #[test]
    fn test_ring_layout_kinds_and_layers() {
        let config = FieldConfig::preset(Preset::Network);
        let mut rng = FieldRng::seeded(1);
        let particles = populate(&config, &mut rng);

        assert_eq!(particles.len(), 37);
        for (i, p) in particles.iter().enumerate() {
            if i < 12 {
                assert_eq!(p.kind, ParticleKind::Interactive);
                assert_eq!(p.layer as usize, i % 3);
            } else {
                assert_eq!(p.kind, ParticleKind::Helper);
                assert!(p.layer < LAYERS);
            }
            let orbit = p.orbit().expect("ring particles orbit");
            assert_eq!(orbit.center, config.bounds.center());
            // 0.35 * 600 = 210; ring tops out at 0.7 + 0.2 + 0.075 of that
            assert!(orbit.radius <= 210.0 + 1e-3);
        }
    }

    #[test]
    fn test_scatter_layout_respects_band() {
        let config = FieldConfig::preset(Preset::Pellets);
        let mut rng = FieldRng::seeded(2);
        let particles = populate(&config, &mut rng);

        assert_eq!(particles.len(), 30);
        for p in &particles {
            assert!((0.0..=100.0).contains(&p.position.x));
            assert!((40.0..=95.0).contains(&p.position.y), "y = {}", p.position.y);
            assert!((6.0..16.0).contains(&p.size));
            assert!(p.color < 5);
            assert_eq!(p.anchor, Anchor::Free);
        }
    }

    #[test]
    fn test_flow_layout_shapes() {
        let config = FieldConfig::preset(Preset::Stream);
        let mut rng = FieldRng::seeded(3);
        let particles = populate(&config, &mut rng);

        let cards = particles.iter().filter(|p| p.shape == ParticleShape::Card).count();
        assert_eq!(cards, 15);
        assert!(particles[15..]
            .iter()
            .all(|p| matches!(p.shape, ParticleShape::Glyph(c) if crate::core::config::STREAM_GLYPHS.contains(c))));
    }

    #[test]
    fn test_respawn_cone() {
        let flow = FlowConfig::default();
        let anchor = Vec2::new(400.0, 260.0);
        let mut rng = FieldRng::seeded(4);
        let mut p = Particle::new(anchor, ParticleKind::Ambient);

        for expected_generation in 0..200u32 {
            respawn(&mut p, &flow, [12.0, 22.0], anchor, &mut rng);
            let trip = *p.flow().unwrap();
            assert_eq!(trip.generation, expected_generation);

            // Origin above the anchor, inside the cone
            let rise = anchor.y - trip.origin.y;
            assert!((400.0..800.0).contains(&rise));
            let lateral = (trip.origin.x - anchor.x).abs();
            assert!(lateral <= rise * flow.cone_half_angle.tan() + 1e-2);

            // Destination near the anchor
            assert!((trip.target.x - anchor.x).abs() <= 40.0);
            assert!((trip.target.y - anchor.y).abs() <= 20.0);

            assert!(p.distance_to_target().unwrap() > flow.arrive_epsilon);
            assert!((trip.fade_distance - trip.journey() * 0.7).abs() < 1e-3);
            assert!((0.2..0.6).contains(&trip.speed));
            assert!((12.0..22.0).contains(&p.size));
        }
    }

    #[test]
    fn test_cards_use_their_own_ranges() {
        let flow = FlowConfig::default();
        let anchor = Vec2::new(400.0, 260.0);
        let mut rng = FieldRng::seeded(9);
        let mut card = Particle::new(anchor, ParticleKind::Ambient);
        card.shape = ParticleShape::Card;

        let mut widest = 0.0f32;
        for _ in 0..300 {
            respawn(&mut card, &flow, [12.0, 22.0], anchor, &mut rng);
            let trip = *card.flow().unwrap();
            assert!((15.0..25.0).contains(&card.size), "card width {}", card.size);
            assert!((0.15..0.45).contains(&trip.speed));
            assert!((trip.target.x - anchor.x).abs() <= 50.0);
            assert!((trip.target.y - anchor.y).abs() <= 25.0);
            widest = widest.max((trip.target.x - anchor.x).abs());
        }
        // Cards land in a wider patch than glyphs (80 x 40)
        assert!(widest > 40.0);
    }
}
