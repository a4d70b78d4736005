//! Platform-agnostic simulation core, shared by the browser mount and the CLI

pub mod config;
pub mod field;
pub mod graph;
pub mod hover;
pub mod math;
pub mod particle;
pub mod spawn;

pub use config::{BoundaryPolicy, FieldConfig, MotionConfig, Preset, MAX_PARTICLES};
pub use field::ParticleField;
pub use graph::{Edge, ProximityGraph};
pub use hover::hit_test;
pub use math::{Bounds, FieldRng, Vec2};
pub use particle::{Anchor, Particle, ParticleKind, ParticleShape};
