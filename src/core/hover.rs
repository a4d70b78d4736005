//! Pointer picking

use super::math::Vec2;
use super::particle::Particle;

/// First hoverable particle (array order) within `radius` of the pointer.
pub fn hit_test(particles: &[Particle], pointer: Vec2, radius: f32) -> Option<usize> {
    let limit = radius * radius;
    particles
        .iter()
        .position(|p| p.kind.is_hoverable() && p.position.distance_squared(pointer) < limit)
}
