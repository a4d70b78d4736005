//! Particle simulation
//!
//! `ParticleField` owns the particle array and advances it one frame per
//! `step()`. Motion is frame-coupled: one step is one display frame, with
//! every constant tuned for ~60 Hz.
//!
//! Pairwise forces read a snapshot of the positions taken at the start of
//! the step, so the outcome does not depend on array order.

use tracing::{debug, trace, warn};

use super::config::{
    BoundaryConfig, BoundaryPolicy, DriftConfig, FieldConfig, FlowConfig, MotionConfig,
    OrbitConfig, PhysicsConfig,
};
use super::math::{Bounds, FieldRng, Vec2};
use super::particle::{Anchor, Particle};
use super::spawn;

/// Velocity retained (and reflected) when a particle hits a hard wall.
const WALL_BOUNCE: f32 = 0.5;

pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    rng: FieldRng,
    pointer: Option<Vec2>,
    /// Positions at the start of the current step.
    snapshot: Vec<Vec2>,
    frame: u64,
    respawns: u64,
}

impl ParticleField {
    /// Field seeded from `config.seed`, or from platform entropy.
    pub fn new(config: &FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => FieldRng::seeded(seed),
            None => FieldRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &FieldConfig, mut rng: FieldRng) -> Self {
        let config = config.sanitized();
        let particles = spawn::populate(&config, &mut rng);
        debug!(
            count = particles.len(),
            interactive = config.interactive_count,
            width = config.bounds.width,
            height = config.bounds.height,
            "Particle field created"
        );
        Self {
            snapshot: Vec::with_capacity(particles.len()),
            config,
            particles,
            rng,
            pointer: None,
            frame: 0,
            respawns: 0,
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Direct access for hosts and tests that place particles by hand.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.config.bounds
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Pointer position in field coordinates, `None` once it left.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer.filter(|p| p.is_finite());
    }

    /// Steps taken since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Flow trips restarted since creation.
    #[inline]
    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// Mark at most one particle as hovered, clearing every other flag.
    pub fn set_hovered(&mut self, hovered: Option<usize>) {
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.hovered = Some(i) == hovered;
        }
    }

    /// Region positions are kept inside, as `(min, max)` corners.
    ///
    /// The margin never exceeds half of the smaller edge and an optional
    /// vertical band narrows the box further.
    pub fn containment(&self) -> (Vec2, Vec2) {
        containment(&self.config.bounds, &self.config.boundary)
    }

    /// Advance the simulation by one frame.
    pub fn step(&mut self) {
        self.frame += 1;

        let Self {
            config,
            particles,
            rng,
            pointer,
            snapshot,
            respawns,
            ..
        } = self;

        match &config.motion {
            MotionConfig::Flow(flow) => {
                *respawns += advance_flow(particles, flow, config, rng);
            }
            MotionConfig::Orbit(orbit) => {
                seek_orbits(particles, orbit);
                apply_forces(particles, snapshot, &config.physics, *pointer);
            }
            MotionConfig::Drift(drift) => {
                apply_forces(particles, snapshot, &config.physics, *pointer);
                add_drift(particles, drift, rng);
            }
        }

        if !matches!(config.motion, MotionConfig::Flow(_)) {
            let damping = config.physics.damping;
            for p in particles.iter_mut() {
                p.velocity *= damping;
                p.position += p.velocity;
            }
        }

        let (min, max) = containment(&config.bounds, &config.boundary);
        let mut reset = 0usize;
        for p in particles.iter_mut() {
            contain(p, &config.boundary, min, max);
            p.rotation += p.spin;
            if !(p.position.is_finite() && p.velocity.is_finite()) {
                p.position = (min + max) * 0.5;
                p.velocity = Vec2::ZERO;
                reset += 1;
            }
        }
        if reset > 0 {
            warn!(frame = self.frame, count = reset, "Non-finite particles reset to centre");
        }

        trace!(frame = self.frame, "Field stepped");
    }

    /// Adopt new container bounds.
    ///
    /// Positions and anchors are mapped from the old centre to the new one
    /// and scaled by `min(w'/w, h'/h)`, so the layout keeps its shape and
    /// stays fully visible.
    pub fn resize(&mut self, width: f32, height: f32) {
        let old = self.config.bounds;
        let new = Bounds::new(width, height);
        if old == new {
            return;
        }

        let scale = (new.width / old.width).min(new.height / old.height);
        let (from, to) = (old.center(), new.center());
        let remap = |p: Vec2| to + (p - from) * scale;

        for p in &mut self.particles {
            p.position = remap(p.position);
            match &mut p.anchor {
                Anchor::Free => {}
                Anchor::Orbit(orbit) => {
                    orbit.center = remap(orbit.center);
                    orbit.radius *= scale;
                }
                Anchor::Flow(flow) => {
                    flow.origin = remap(flow.origin);
                    flow.target = remap(flow.target);
                    flow.fade_distance *= scale;
                }
            }
        }

        self.config.bounds = new;
        debug!(
            from_width = old.width,
            from_height = old.height,
            width = new.width,
            height = new.height,
            scale,
            "Field resized"
        );
    }
}

pub fn containment(bounds: &Bounds, boundary: &BoundaryConfig) -> (Vec2, Vec2) {
    let margin = boundary.margin.clamp(0.0, bounds.min_edge() * 0.5);
    let mut min = Vec2::splat(margin);
    let mut max = bounds.size() - Vec2::splat(margin);

    if let Some([top, bottom]) = boundary.band {
        min.y = min.y.max(top * bounds.height);
        max.y = max.y.min(bottom * bounds.height);
    }
    (min, max.max(min))
}

/// Spring each orbiting particle toward its (advanced) orbit point.
fn seek_orbits(particles: &mut [Particle], config: &OrbitConfig) {
    for p in particles.iter_mut() {
        let Anchor::Orbit(orbit) = &mut p.anchor else {
            continue;
        };
        orbit.angle += orbit.speed;
        let mut target = orbit.point();

        if let Some(wobble) = config.wobble {
            orbit.wobble_phase += wobble.frequency;
            let phase = orbit.wobble_phase;
            target += Vec2::new(phase.sin(), (phase * 1.3).cos()) * wobble.amplitude;
        }

        p.velocity += (target - p.position) * config.seek_strength;
    }
}

/// Pairwise repulsion/attraction and pointer repulsion.
fn apply_forces(
    particles: &mut [Particle],
    snapshot: &mut Vec<Vec2>,
    physics: &PhysicsConfig,
    pointer: Option<Vec2>,
) {
    if physics.pairwise {
        snapshot.clear();
        snapshot.extend(particles.iter().map(|p| p.position));

        for (i, p) in particles.iter_mut().enumerate() {
            let here = snapshot[i];
            let mut force = Vec2::ZERO;

            for (j, &there) in snapshot.iter().enumerate() {
                if i == j {
                    continue;
                }
                let delta = there - here;
                let dist = delta.length();
                if dist <= f32::EPSILON {
                    continue;
                }
                let dir = delta / dist;

                if dist < physics.min_distance {
                    force -= dir * (physics.min_distance - dist) * physics.repulsion_strength;
                } else if dist < physics.interaction_radius {
                    force += dir * physics.attraction_strength * dist * 0.1;
                }
            }
            p.velocity += force;
        }
    }

    if let (Some(ptr), Some(push)) = (pointer, physics.pointer) {
        for p in particles.iter_mut() {
            let delta = ptr - p.position;
            let dist = delta.length();
            if dist < push.radius && dist > f32::EPSILON {
                let falloff = (push.radius - dist) / push.radius;
                p.velocity -= delta / dist * falloff * push.strength;
            }
        }
    }
}

fn add_drift(particles: &mut [Particle], drift: &DriftConfig, rng: &mut FieldRng) {
    for p in particles.iter_mut() {
        p.velocity += Vec2::new(
            rng.centered() * drift.jitter[0],
            rng.centered() * drift.jitter[1],
        );
    }
}

/// Move flow particles straight at their destination; restart arrivals.
/// Returns the number of respawns.
fn advance_flow(
    particles: &mut [Particle],
    flow: &FlowConfig,
    config: &FieldConfig,
    rng: &mut FieldRng,
) -> u64 {
    let anchor = spawn::flow_anchor(&config.bounds, flow);
    let mut restarted = 0;

    for p in particles.iter_mut() {
        let Some(trip) = p.flow().copied() else {
            continue;
        };
        let delta = trip.target - p.position;
        let dist = delta.length();

        if dist < flow.arrive_epsilon {
            spawn::respawn(p, flow, config.particle_size, anchor, rng);
            restarted += 1;
        } else {
            p.velocity = delta / dist * trip.speed;
            p.position += p.velocity;
        }
    }
    restarted
}

fn contain(p: &mut Particle, boundary: &BoundaryConfig, min: Vec2, max: Vec2) {
    match boundary.policy {
        BoundaryPolicy::Unbounded => {}
        BoundaryPolicy::HardClamp => {
            if p.position.x < min.x {
                p.position.x = min.x;
                p.velocity.x = p.velocity.x.abs() * WALL_BOUNCE;
            } else if p.position.x > max.x {
                p.position.x = max.x;
                p.velocity.x = -p.velocity.x.abs() * WALL_BOUNCE;
            }
            if p.position.y < min.y {
                p.position.y = min.y;
                p.velocity.y = p.velocity.y.abs() * WALL_BOUNCE;
            } else if p.position.y > max.y {
                p.position.y = max.y;
                p.velocity.y = -p.velocity.y.abs() * WALL_BOUNCE;
            }
        }
        BoundaryPolicy::SoftPush => {
            let under = (min - p.position).max(Vec2::ZERO);
            let over = (p.position - max).max(Vec2::ZERO);
            // Outward motion stops, the overshoot comes back as inward speed
            if under.x > 0.0 {
                p.velocity.x = p.velocity.x.max(0.0) + under.x;
            } else if over.x > 0.0 {
                p.velocity.x = p.velocity.x.min(0.0) - over.x;
            }
            if under.y > 0.0 {
                p.velocity.y = p.velocity.y.max(0.0) + under.y;
            } else if over.y > 0.0 {
                p.velocity.y = p.velocity.y.min(0.0) - over.y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Preset;
    use crate::core::particle::ParticleKind;

    fn seeded(preset: Preset, seed: u64) -> ParticleField {
        let mut config = FieldConfig::preset(preset);
        config.seed = Some(seed);
        ParticleField::new(&config)
    }

    fn inside(field: &ParticleField) -> bool {
        let (min, max) = field.containment();
        field.particles().iter().all(|p| {
            p.position.x >= min.x - 1e-3
                && p.position.x <= max.x + 1e-3
                && p.position.y >= min.y - 1e-3
                && p.position.y <= max.y + 1e-3
        })
    }

    #[test]
    fn test_network_stays_in_margin_box() {
        let mut field = seeded(Preset::Network, 11);
        for _ in 0..600 {
            field.step();
            assert!(inside(&field), "escaped at frame {}", field.frame());
        }
        assert!(field.particles().iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn test_pellets_stay_in_band() {
        let mut field = seeded(Preset::Pellets, 5);
        field.set_pointer(Some(Vec2::new(50.0, 60.0)));
        for _ in 0..600 {
            field.step();
        }
        let (min, max) = field.containment();
        assert!((min.y - 40.0).abs() < 1e-4);
        assert!((max.y - 95.0).abs() < 1e-4);
        assert!(inside(&field));
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = seeded(Preset::Stream, 99);
        let mut b = seeded(Preset::Stream, 99);
        for _ in 0..300 {
            a.step();
            b.step();
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.respawns(), b.respawns());
    }

    #[test]
    fn test_zero_particles() {
        let mut config = FieldConfig::default();
        config.particle_count = 0;
        let mut field = ParticleField::new(&config);
        field.step();
        field.resize(10.0, 10.0);
        field.set_hovered(Some(0));
        assert!(field.particles().is_empty());
    }

    #[test]
    fn test_pair_inside_min_distance_separates() {
        let mut config = FieldConfig::default();
        config.particle_count = 2;
        config.interactive_count = 2;
        config.seed = Some(1);
        let mut field = ParticleField::new(&config);

        let a = Vec2::new(390.0, 300.0);
        let b = Vec2::new(410.0, 300.0);
        for (p, pos) in field.particles_mut().iter_mut().zip([a, b]) {
            p.position = pos;
            p.velocity = Vec2::ZERO;
            p.anchor = Anchor::Free;
        }
        field.step();

        let ps = field.particles();
        assert!(ps[0].position.distance(ps[1].position) > 20.0);
        // Symmetric snapshot: equal and opposite pushes
        assert!((ps[0].velocity.x + ps[1].velocity.x).abs() < 1e-4);
        assert!(ps[0].velocity.x < 0.0);
    }

    #[test]
    fn test_attraction_band_pulls_together() {
        let mut config = FieldConfig::default();
        config.particle_count = 2;
        config.seed = Some(1);
        let mut field = ParticleField::new(&config);

        for (p, x) in field.particles_mut().iter_mut().zip([300.0, 450.0]) {
            p.position = Vec2::new(x, 300.0);
            p.velocity = Vec2::ZERO;
            p.anchor = Anchor::Free;
        }
        field.step();

        let ps = field.particles();
        // 0.0003 * 150 * 0.1 = 0.0045 per frame, damped by 0.92
        assert!((ps[0].velocity.x - 0.0045 * 0.92).abs() < 1e-5);
        assert!(ps[0].position.distance(ps[1].position) < 150.0);
    }

    #[test]
    fn test_flow_arrival_respawns() {
        let mut field = seeded(Preset::Stream, 3);
        let target = field.particles()[20].flow().unwrap().target;
        let generation = field.particles()[20].flow().unwrap().generation;
        field.particles_mut()[20].position = target + Vec2::new(1.0, 0.0);

        field.step();

        let p = &field.particles()[20];
        let trip = p.flow().unwrap();
        assert_eq!(trip.generation, generation + 1);
        assert_eq!(p.position, trip.origin);
        assert!(p.distance_to_target().unwrap() > 15.0);
        assert!(field.respawns() >= 1);
    }

    #[test]
    fn test_flow_moves_at_constant_speed() {
        let mut field = seeded(Preset::Stream, 8);
        let before: Vec<_> = field.particles().iter().map(|p| p.position).collect();
        field.step();
        for (p, was) in field.particles().iter().zip(before) {
            let trip = p.flow().unwrap();
            if trip.generation == 0 {
                assert!((p.position.distance(was) - trip.speed).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_resize_scales_about_center() {
        let mut config = FieldConfig::preset(Preset::Network);
        config.bounds = Bounds::new(600.0, 600.0);
        config.seed = Some(21);
        let mut field = ParticleField::new(&config);
        let before: Vec<_> = field.particles().iter().map(|p| p.position).collect();

        field.resize(1200.0, 900.0);

        let k = 1.5;
        let (old_c, new_c) = (Vec2::new(300.0, 300.0), Vec2::new(600.0, 450.0));
        for (p, was) in field.particles().iter().zip(before) {
            let expected = new_c + (was - old_c) * k;
            assert!(p.position.distance(expected) < 1e-3);
            assert_eq!(p.orbit().unwrap().center, new_c);
        }
        assert_eq!(field.bounds(), Bounds::new(1200.0, 900.0));
    }

    #[test]
    fn test_resize_degenerate_bounds() {
        let mut field = seeded(Preset::Network, 2);
        field.resize(0.0, f32::NAN);
        assert_eq!(field.bounds(), Bounds::new(1.0, 1.0));
        field.step();
        assert!(field.particles().iter().all(|p| p.position.is_finite()));
        assert!(inside(&field));
    }

    #[test]
    fn test_hover_flags_are_exclusive() {
        let mut field = seeded(Preset::Network, 4);
        field.set_hovered(Some(3));
        assert_eq!(field.particles().iter().filter(|p| p.hovered).count(), 1);
        assert!(field.particles()[3].hovered);
        field.set_hovered(None);
        assert!(field.particles().iter().all(|p| !p.hovered));
    }

    /// Per-axis distance outside the margin box.
    fn overshoot(p: &Particle, min: Vec2, max: Vec2) -> Vec2 {
        (min - p.position).max(p.position - max).max(Vec2::ZERO)
    }

    #[test]
    fn test_soft_push_overshoot_within_one_frame() {
        let mut config = FieldConfig::preset(Preset::Network);
        config.boundary.policy = BoundaryPolicy::SoftPush;
        config.seed = Some(11);
        let mut field = ParticleField::new(&config);
        let (min, max) = field.containment();
        let bounds = field.bounds();

        for _ in 0..2000 {
            field.step();
            for p in field.particles() {
                let out = overshoot(p, min, max);
                assert!(out.x <= p.velocity.x.abs() + 1e-3, "x overshoot {} at frame {}", out.x, field.frame());
                assert!(out.y <= p.velocity.y.abs() + 1e-3, "y overshoot {} at frame {}", out.y, field.frame());
                let eps = p.velocity.abs() + Vec2::splat(1e-3);
                assert!(p.position.cmpge(-eps).all());
                assert!(p.position.cmple(bounds.size() + eps).all());
            }
        }
    }

    #[test]
    fn test_soft_push_pulls_back_outsider() {
        let mut config = FieldConfig::preset(Preset::Network);
        config.particle_count = 1;
        config.boundary.policy = BoundaryPolicy::SoftPush;
        config.physics.pairwise = false;
        config.connections = None;
        config.seed = Some(6);
        let mut field = ParticleField::new(&config);
        {
            let p = &mut field.particles_mut()[0];
            p.position = Vec2::new(-100.0, 300.0);
            p.velocity = Vec2::new(-5.0, 0.0);
            p.anchor = Anchor::Free;
            assert_eq!(p.kind, ParticleKind::Interactive);
        }
        field.step();
        let (min, _) = field.containment();
        let p = &field.particles()[0];
        // Outward speed gone, inward speed covers the whole overshoot
        assert!(p.velocity.x >= min.x - p.position.x);
        for _ in 0..5 {
            field.step();
        }
        assert!(field.particles()[0].position.x >= min.x - 1e-3);
    }

    #[test]
    fn test_extreme_forces_never_reach_nan() {
        let config = FieldConfig::from_json(r#"{"physics": {"repulsion_strength": 1e37}, "seed": 3}"#).unwrap();
        let mut field = ParticleField::new(&config);
        for _ in 0..200 {
            field.step();
            assert!(field
                .particles()
                .iter()
                .all(|p| p.position.is_finite() && p.velocity.is_finite()));
        }
        assert!(inside(&field));
    }

    #[test]
    fn test_non_finite_particle_is_reset() {
        let mut field = seeded(Preset::Network, 7);
        field.particles_mut()[4].position = Vec2::new(f32::NAN, 10.0);
        field.particles_mut()[5].velocity = Vec2::new(f32::INFINITY, 0.0);
        field.step();

        let (min, max) = field.containment();
        for p in field.particles() {
            assert!(p.position.is_finite() && p.velocity.is_finite());
        }
        assert_eq!(field.particles()[4].position, (min + max) * 0.5);
        assert_eq!(field.particles()[4].velocity, Vec2::ZERO);
    }
}
