//! Field configuration, presets, and sanitizing
//!
//! A `FieldConfig` is plain data: every struct derives serde with
//! `#[serde(default)]`, so hosts pass only the keys they care about as
//! JSON. `sanitized()` is applied before a config reaches the simulation
//! and replaces anything that would feed NaN/Infinity into the physics.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::f32::consts::FRAC_PI_4;
use tracing::{debug, warn};

use super::math::Bounds;
use crate::error::ConfigError;
use crate::theme::{colors, Rgba};

/// Hard ceiling on particle count (pairwise work is quadratic).
pub const MAX_PARTICLES: usize = 2000;

/// Ceiling for force gains; larger values overflow pairwise sums.
const MAX_GAIN: f32 = 10.0;

/// Ceiling for per-frame speeds and jitter widths.
const MAX_SPEED: f32 = 100.0;

/// Ceiling for distances, radii and sizes.
const MAX_EXTENT: f32 = 1.0e5;

/// Glyph set of the stream variant.
pub const STREAM_GLYPHS: &str = "01{}<>/\\|-+*#";

/// Complete per-instance configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Total particles, helpers included.
    #[serde(deserialize_with = "clamped_count")]
    pub particle_count: usize,
    /// How many of the first particles are interactive (drawn + hoverable).
    #[serde(deserialize_with = "clamped_count")]
    pub interactive_count: usize,
    pub bounds: Bounds,
    pub motion: MotionConfig,
    pub physics: PhysicsConfig,
    pub boundary: BoundaryConfig,
    /// Proximity graph; `None` disables connection lines entirely.
    pub connections: Option<ConnectionConfig>,
    pub palette: Palette,
    /// `[min, max)` size drawn per particle (diameter, font size or card width).
    pub particle_size: [f32; 2],
    /// Pointer distance under which an interactive particle counts as hovered.
    pub pick_radius: f32,
    /// Fixed seed for reproducible runs; `None` draws from platform entropy.
    pub seed: Option<u64>,
}

/// How particles move between frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MotionConfig {
    /// Circle a shared centre, spring-pulled toward the orbit point.
    Orbit(OrbitConfig),
    /// Travel from a spawn cone to a destination, then respawn.
    Flow(FlowConfig),
    /// No anchor; random-walk noise on top of the shared forces.
    Drift(DriftConfig),
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig::Orbit(OrbitConfig::default())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Layout radius as a fraction of the smaller container edge.
    pub radius_fraction: f32,
    /// Base angular speed (radians/frame) of interactive particles.
    pub interactive_speed: f32,
    /// Base angular speed of helper particles.
    pub helper_speed: f32,
    /// Width of the centred random term added to the base speed.
    pub speed_jitter: f32,
    /// Fraction of the gap to the orbit point added to velocity each frame.
    pub seek_strength: f32,
    /// Width of the centred random initial velocity per axis.
    pub initial_speed: f32,
    pub wobble: Option<Wobble>,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius_fraction: 0.35,
            interactive_speed: 0.0005,
            helper_speed: 0.0003,
            speed_jitter: 0.001,
            seek_strength: 0.01,
            initial_speed: 0.8,
            wobble: None,
        }
    }
}

/// Small independent oscillation added to the orbit target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wobble {
    pub amplitude: f32,
    /// Phase advance per frame.
    pub frequency: f32,
}

impl Default for Wobble {
    fn default() -> Self {
        Self { amplitude: 6.0, frequency: 0.02 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Destination centre relative to the container centre.
    pub anchor_offset: [f32; 2],
    /// Half-angle of the spawn cone around "straight up".
    pub cone_half_angle: f32,
    /// `[min, max)` distance of a spawn point above the anchor.
    pub spawn_distance: [f32; 2],
    /// Full width/height of the random destination offset of glyphs.
    pub target_jitter: [f32; 2],
    /// Same for cards, which land in a wider patch.
    pub card_target_jitter: [f32; 2],
    /// `[min, max)` travel speed per frame of glyph particles.
    pub speed: [f32; 2],
    /// `[min, max)` travel speed per frame of card particles.
    pub card_speed: [f32; 2],
    /// `[min, max)` card width; glyphs take the field's `particle_size`.
    pub card_size: [f32; 2],
    /// Distance to target under which a particle respawns.
    pub arrive_epsilon: f32,
    /// Share of the journey over which opacity ramps in.
    pub fade_in_fraction: f32,
    /// Distance to target over which opacity ramps out.
    pub fade_out_distance: f32,
    /// Characters the glyph particles pick from.
    pub glyphs: String,
    /// How many of the first particles are drawn as cards.
    pub card_count: usize,
    /// Width of the centred random spin (radians/frame) of cards.
    pub spin: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            anchor_offset: [0.0, -40.0],
            cone_half_angle: FRAC_PI_4,
            spawn_distance: [400.0, 800.0],
            target_jitter: [80.0, 40.0],
            card_target_jitter: [100.0, 50.0],
            speed: [0.2, 0.6],
            card_speed: [0.15, 0.45],
            card_size: [15.0, 25.0],
            arrive_epsilon: 15.0,
            fade_in_fraction: 0.7,
            fade_out_distance: 80.0,
            glyphs: STREAM_GLYPHS.to_string(),
            card_count: 0,
            spin: 0.03,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Width of the centred random initial velocity, per axis.
    pub initial_speed: [f32; 2],
    /// Width of the centred random velocity kick added each frame, per axis.
    pub jitter: [f32; 2],
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            initial_speed: [0.02, 0.01],
            jitter: [0.002, 0.001],
        }
    }
}

/// Forces shared by the orbit and drift modes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Velocity retention per frame (`< 1`).
    pub damping: f32,
    /// Enables the O(n²) repulsion/attraction pass.
    pub pairwise: bool,
    pub repulsion_strength: f32,
    pub attraction_strength: f32,
    /// Separation under which particles repel.
    pub min_distance: f32,
    /// Outer radius of the weak attraction band.
    pub interaction_radius: f32,
    pub pointer: Option<PointerForce>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.92,
            pairwise: true,
            repulsion_strength: 0.5,
            attraction_strength: 0.0003,
            min_distance: 80.0,
            interaction_radius: 250.0,
            pointer: None,
        }
    }
}

/// Push particles away from the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerForce {
    pub radius: f32,
    pub strength: f32,
}

impl Default for PointerForce {
    fn default() -> Self {
        Self { radius: 8.0, strength: 0.1 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clamp into the margin box, reflect and halve the velocity component.
    #[default]
    HardClamp,
    /// No clamp: the outward velocity component is cancelled and the
    /// overshoot is added back as an inward nudge, so a particle is never
    /// further out than its own per-frame velocity.
    SoftPush,
    /// No containment (flow particles spawn outside the container).
    Unbounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub policy: BoundaryPolicy,
    pub margin: f32,
    /// Optional vertical band `[top, bottom]` as fractions of the height.
    pub band: Option<[f32; 2]>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            policy: BoundaryPolicy::HardClamp,
            margin: 50.0,
            band: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Pairs closer than this get an edge.
    pub threshold: f32,
    pub degree_cap: usize,
    /// Seconds between rebuilds.
    pub rebuild_interval: f64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            threshold: 350.0,
            degree_cap: 8,
            rebuild_interval: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgba,
    pub node: Rgba,
    pub edge: Rgba,
    pub edge_highlight: Rgba,
    /// Per-particle colours; each particle picks one at spawn.
    pub particles: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: colors::BG_WHITE,
            node: colors::NODE,
            edge: colors::EDGE,
            edge_highlight: colors::EDGE_HOT,
            particles: vec![colors::NODE],
        }
    }
}

/// The three built-in scene variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Network,
    Stream,
    Pellets,
}

impl Preset {
    pub const ALL: &'static [Preset] = &[Preset::Network, Preset::Stream, Preset::Pellets];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Network => "network",
            Preset::Stream => "stream",
            Preset::Pellets => "pellets",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::preset(Preset::Network)
    }
}

impl FieldConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            // 12 data nodes on a ring plus 25 invisible helpers thickening the web
            Preset::Network => Self {
                particle_count: 37,
                interactive_count: 12,
                bounds: Bounds::new(800.0, 600.0),
                motion: MotionConfig::Orbit(OrbitConfig::default()),
                physics: PhysicsConfig::default(),
                boundary: BoundaryConfig::default(),
                connections: Some(ConnectionConfig::default()),
                palette: Palette::default(),
                particle_size: [24.0, 24.0],
                pick_radius: 22.0,
                seed: None,
            },
            // 15 cards behind 50 glyphs falling into the centre
            Preset::Stream => Self {
                particle_count: 65,
                interactive_count: 0,
                bounds: Bounds::new(800.0, 600.0),
                motion: MotionConfig::Flow(FlowConfig {
                    card_count: 15,
                    ..FlowConfig::default()
                }),
                physics: PhysicsConfig {
                    pairwise: false,
                    ..PhysicsConfig::default()
                },
                boundary: BoundaryConfig {
                    policy: BoundaryPolicy::Unbounded,
                    ..BoundaryConfig::default()
                },
                connections: None,
                palette: Palette {
                    particles: vec![colors::STREAM],
                    ..Palette::default()
                },
                particle_size: [12.0, 22.0],
                pick_radius: 22.0,
                seed: None,
            },
            // Percent plane: x in 0..100, pellets kept between 40% and 95% height
            Preset::Pellets => Self {
                particle_count: 30,
                interactive_count: 0,
                bounds: Bounds::new(100.0, 100.0),
                motion: MotionConfig::Drift(DriftConfig::default()),
                physics: PhysicsConfig {
                    damping: 0.98,
                    pairwise: false,
                    pointer: Some(PointerForce::default()),
                    ..PhysicsConfig::default()
                },
                boundary: BoundaryConfig {
                    policy: BoundaryPolicy::HardClamp,
                    margin: 0.0,
                    band: Some([0.40, 0.95]),
                },
                connections: None,
                palette: Palette {
                    background: colors::BG_CLEAR,
                    particles: colors::PELLETS.to_vec(),
                    ..Palette::default()
                },
                particle_size: [6.0, 16.0],
                pick_radius: 0.0,
                seed: None,
            },
        }
    }

    /// Parse a JSON config. A top-level `"preset"` key selects the base
    /// config the remaining keys are merged into; otherwise the network
    /// preset is the base.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: Value = serde_json::from_str(json)?;

        let preset = match overrides.get("preset").and_then(Value::as_str) {
            Some(name) => Preset::from_name(name)?,
            None => Preset::Network,
        };

        let mut merged = serde_json::to_value(Self::preset(preset))?;
        merge_json(&mut merged, overrides);
        if let Value::Object(map) = &mut merged {
            map.remove("preset");
        }

        let config: FieldConfig = serde_json::from_value(merged)?;
        debug!(preset = preset.name(), count = config.particle_count, "Parsed field config");
        Ok(config.sanitized())
    }

    /// Copy with every value forced into a range the simulation can use.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();

        c.particle_count = c.particle_count.min(MAX_PARTICLES);
        c.interactive_count = c.interactive_count.min(c.particle_count);
        c.bounds = Bounds::new(c.bounds.width, c.bounds.height);
        c.particle_size = sane_range(c.particle_size, [24.0, 24.0], MAX_EXTENT);
        c.pick_radius = capped(c.pick_radius, 22.0, MAX_EXTENT);

        match &mut c.motion {
            MotionConfig::Orbit(o) => {
                o.radius_fraction = non_negative(o.radius_fraction, 0.35).min(0.5);
                o.interactive_speed = finite(o.interactive_speed, 0.0005).clamp(-1.0, 1.0);
                o.helper_speed = finite(o.helper_speed, 0.0003).clamp(-1.0, 1.0);
                o.speed_jitter = capped(o.speed_jitter, 0.001, 1.0);
                o.seek_strength = capped(o.seek_strength, 0.01, 1.0);
                o.initial_speed = capped(o.initial_speed, 0.8, MAX_SPEED);
                if let Some(w) = &mut o.wobble {
                    w.amplitude = capped(w.amplitude, 6.0, MAX_EXTENT);
                    w.frequency = finite(w.frequency, 0.02).clamp(-1.0, 1.0);
                }
            }
            MotionConfig::Flow(f) => {
                f.anchor_offset = [
                    finite(f.anchor_offset[0], 0.0).clamp(-MAX_EXTENT, MAX_EXTENT),
                    finite(f.anchor_offset[1], -40.0).clamp(-MAX_EXTENT, MAX_EXTENT),
                ];
                f.cone_half_angle = non_negative(f.cone_half_angle, FRAC_PI_4).min(1.5);
                f.arrive_epsilon = capped(f.arrive_epsilon, 15.0, MAX_EXTENT).max(0.5);
                f.target_jitter = [
                    capped(f.target_jitter[0], 80.0, MAX_EXTENT),
                    capped(f.target_jitter[1], 40.0, MAX_EXTENT),
                ];
                f.card_target_jitter = [
                    capped(f.card_target_jitter[0], 100.0, MAX_EXTENT),
                    capped(f.card_target_jitter[1], 50.0, MAX_EXTENT),
                ];
                // A spawn point must always land outside the arrival radius
                let min_spawn =
                    f.arrive_epsilon * 2.0 + f.target_jitter[1].max(f.card_target_jitter[1]);
                f.spawn_distance = sane_range(f.spawn_distance, [400.0, 800.0], MAX_EXTENT);
                f.spawn_distance[0] = f.spawn_distance[0].max(min_spawn);
                f.spawn_distance[1] = f.spawn_distance[1].max(f.spawn_distance[0]);
                f.speed = sane_range(f.speed, [0.2, 0.6], MAX_SPEED);
                f.card_speed = sane_range(f.card_speed, [0.15, 0.45], MAX_SPEED);
                f.card_size = sane_range(f.card_size, [15.0, 25.0], MAX_EXTENT);
                f.fade_in_fraction = capped(f.fade_in_fraction, 0.7, 1.0);
                f.fade_out_distance = capped(f.fade_out_distance, 80.0, MAX_EXTENT);
                f.spin = capped(f.spin, 0.03, 1.0);
                f.card_count = f.card_count.min(c.particle_count);
                if f.glyphs.is_empty() {
                    f.glyphs = STREAM_GLYPHS.to_string();
                }
            }
            MotionConfig::Drift(d) => {
                d.initial_speed = [
                    capped(d.initial_speed[0], 0.02, MAX_SPEED),
                    capped(d.initial_speed[1], 0.01, MAX_SPEED),
                ];
                d.jitter = [capped(d.jitter[0], 0.002, MAX_SPEED), capped(d.jitter[1], 0.001, MAX_SPEED)];
            }
        }

        let p = &mut c.physics;
        p.damping = capped(p.damping, 0.92, 1.0);
        p.repulsion_strength = capped(p.repulsion_strength, 0.5, MAX_GAIN);
        p.attraction_strength = capped(p.attraction_strength, 0.0003, MAX_GAIN);
        p.min_distance = capped(p.min_distance, 80.0, MAX_EXTENT);
        p.interaction_radius = capped(p.interaction_radius, 250.0, MAX_EXTENT).max(p.min_distance);
        if let Some(ptr) = &mut p.pointer {
            ptr.radius = capped(ptr.radius, 8.0, MAX_EXTENT);
            ptr.strength = capped(ptr.strength, 0.1, MAX_GAIN);
        }

        let b = &mut c.boundary;
        b.margin = non_negative(b.margin, 50.0).min(c.bounds.min_edge() * 0.5);
        if let Some(band) = &mut b.band {
            let [top, bottom] = sane_range(*band, [0.0, 1.0], 1.0);
            *band = [top.clamp(0.0, 1.0), bottom.clamp(0.0, 1.0)];
        }

        if let Some(conn) = &mut c.connections {
            conn.threshold = capped(conn.threshold, 350.0, MAX_EXTENT);
            conn.rebuild_interval = if conn.rebuild_interval.is_finite() {
                conn.rebuild_interval.max(0.05)
            } else {
                2.0
            };
        }

        if c.palette.particles.is_empty() {
            c.palette.particles.push(c.palette.node);
        }

        if c != *self {
            warn!(count = c.particle_count, "Field config adjusted to safe values");
        }
        c
    }
}

fn finite(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

fn non_negative(v: f32, fallback: f32) -> f32 {
    finite(v, fallback).max(0.0)
}

fn capped(v: f32, fallback: f32, max: f32) -> f32 {
    non_negative(v, fallback).min(max)
}

/// Ordered `[lo, hi]` within `0..=max`.
fn sane_range(r: [f32; 2], fallback: [f32; 2], max: f32) -> [f32; 2] {
    let lo = capped(r[0], fallback[0], max);
    let hi = capped(r[1], fallback[1], max);
    if lo <= hi {
        [lo, hi]
    } else {
        [hi, lo]
    }
}

/// Accept any JSON integer, clamping negatives to 0 and huge values to the cap.
fn clamped_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, MAX_PARTICLES as i64) as usize)
}

/// Recursively overlay `patch` onto `base` (objects merge, everything else replaces).
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => merge_json(slot, value),
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_already_sane() {
        for &preset in Preset::ALL {
            let config = FieldConfig::preset(preset);
            assert_eq!(config.sanitized(), config, "{} preset", preset.name());
        }
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_name("pellets").unwrap(), Preset::Pellets);
        assert_eq!(Preset::from_name(" Network ").unwrap(), Preset::Network);
        assert!(matches!(
            Preset::from_name("aurora"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_negative_count_clamps_to_zero() {
        let config = FieldConfig::from_json(r#"{"particle_count": -5, "interactive_count": 3}"#).unwrap();
        assert_eq!(config.particle_count, 0);
        assert_eq!(config.interactive_count, 0);

        let config = FieldConfig::from_json(r#"{"particle_count": 1000000}"#).unwrap();
        assert_eq!(config.particle_count, MAX_PARTICLES);
    }

    #[test]
    fn test_zero_bounds_clamp_to_minimum() {
        let config = FieldConfig::from_json(r#"{"bounds": {"width": 0, "height": -3}}"#).unwrap();
        assert_eq!(config.bounds.width, 1.0);
        assert_eq!(config.bounds.height, 1.0);
        assert!(config.boundary.margin <= 0.5);
    }

    #[test]
    fn test_preset_overrides_merge() {
        let config = FieldConfig::from_json(
            r#"{"preset": "pellets", "particle_count": 12, "physics": {"damping": 0.9}}"#,
        )
        .unwrap();

        assert_eq!(config.particle_count, 12);
        assert_eq!(config.physics.damping, 0.9);
        // Untouched keys keep the preset values
        assert!(config.physics.pointer.is_some());
        assert!(matches!(config.motion, MotionConfig::Drift(_)));
        assert_eq!(config.palette.particles.len(), 5);
    }

    #[test]
    fn test_motion_mode_switch() {
        let config = FieldConfig::from_json(
            r#"{"motion": {"mode": "orbit", "wobble": {"amplitude": 4.0}}}"#,
        )
        .unwrap();
        match config.motion {
            MotionConfig::Orbit(o) => {
                let wobble = o.wobble.expect("wobble parsed");
                assert_eq!(wobble.amplitude, 4.0);
                assert_eq!(wobble.frequency, Wobble::default().frequency);
                assert_eq!(o.seek_strength, 0.01);
            }
            other => panic!("expected orbit, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        assert!(matches!(FieldConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            FieldConfig::from_json(r#"{"preset": "nope"}"#),
            Err(ConfigError::UnknownPreset(_))
        ));
        assert!(FieldConfig::from_json(r##"{"palette": {"node": "#12"}}"##).is_err());
    }

    #[test]
    fn test_sanitize_fixes_ranges() {
        let mut config = FieldConfig::preset(Preset::Stream);
        config.particle_size = [30.0, 10.0];
        config.physics.damping = f32::NAN;
        if let MotionConfig::Flow(f) = &mut config.motion {
            f.spawn_distance = [1.0, 2.0];
            f.card_count = 500;
        }

        let c = config.sanitized();
        assert_eq!(c.particle_size, [10.0, 30.0]);
        assert_eq!(c.physics.damping, 0.92);
        match c.motion {
            MotionConfig::Flow(f) => {
                assert!(f.spawn_distance[0] >= f.arrive_epsilon * 2.0);
                assert!(f.spawn_distance[1] >= f.spawn_distance[0]);
                assert_eq!(f.card_count, c.particle_count);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_huge_finite_values_are_capped() {
        let config = FieldConfig::from_json(
            r#"{"physics": {"repulsion_strength": 1e37, "attraction_strength": 1e30,
                "min_distance": 1e38, "pointer": {"radius": 1e38, "strength": 1e38}},
                "motion": {"mode": "orbit", "seek_strength": 1e20, "initial_speed": 1e38,
                "interactive_speed": -1e30},
                "bounds": {"width": 1e38, "height": 600}, "seed": 3}"#,
        )
        .unwrap();

        let p = &config.physics;
        assert_eq!(p.repulsion_strength, MAX_GAIN);
        assert_eq!(p.attraction_strength, MAX_GAIN);
        assert_eq!(p.min_distance, MAX_EXTENT);
        let ptr = p.pointer.expect("pointer kept");
        assert_eq!((ptr.radius, ptr.strength), (MAX_EXTENT, MAX_GAIN));
        match &config.motion {
            MotionConfig::Orbit(o) => {
                assert_eq!(o.seek_strength, 1.0);
                assert_eq!(o.initial_speed, MAX_SPEED);
                assert_eq!(o.interactive_speed, -1.0);
            }
            other => panic!("expected orbit, got {:?}", other),
        }
        assert_eq!(config.bounds.width, crate::core::math::MAX_BOUND);
    }

    #[test]
    fn test_drift_and_flow_caps() {
        let mut config = FieldConfig::preset(Preset::Pellets);
        if let MotionConfig::Drift(d) = &mut config.motion {
            d.jitter = [1e30, f32::MAX];
            d.initial_speed = [1e30, 0.5];
        }
        match config.sanitized().motion {
            MotionConfig::Drift(d) => {
                assert_eq!(d.jitter, [MAX_SPEED, MAX_SPEED]);
                assert_eq!(d.initial_speed, [MAX_SPEED, 0.5]);
            }
            _ => unreachable!(),
        }

        let mut config = FieldConfig::preset(Preset::Stream);
        if let MotionConfig::Flow(f) = &mut config.motion {
            f.card_size = [40.0, 1e30];
            f.card_target_jitter = [f32::NAN, 1e9];
        }
        match config.sanitized().motion {
            MotionConfig::Flow(f) => {
                assert_eq!(f.card_size, [40.0, MAX_EXTENT]);
                assert_eq!(f.card_target_jitter, [100.0, MAX_EXTENT]);
                assert!(f.spawn_distance[0] >= f.arrive_epsilon * 2.0 + MAX_EXTENT);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = FieldConfig::preset(Preset::Pellets);
        let json = serde_json::to_string(&config).unwrap();
        let back = FieldConfig::from_json(&json).unwrap();
        // No "preset" key: network base, but every key is overridden
        assert_eq!(back, config);
    }
}
