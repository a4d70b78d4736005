//! Geometry helpers and the injectable random source

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::warn;

pub use glam::Vec2;

/// Smallest accepted container edge, in surface units.
pub const MIN_BOUND: f32 = 1.0;

/// Largest accepted container edge.
pub const MAX_BOUND: f32 = 1.0e6;

/// Container size. Always finite and within `MIN_BOUND..=MAX_BOUND` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Build bounds, mapping non-finite edges to `MIN_BOUND` and clamping the rest.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sane_bound(width),
            height: sane_bound(height),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    #[inline]
    pub fn min_edge(&self) -> f32 {
        self.width.min(self.height)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

fn sane_bound(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(MIN_BOUND, MAX_BOUND)
    } else {
        MIN_BOUND
    }
}

/// Hermite ease `t*t*(3-2t)` on `t` clamped to `0..=1`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Random source owned by a field.
///
/// Every random draw of the simulation (initial layout, respawns, drift
/// noise) goes through one of these, so a fixed seed gives identical runs.
#[derive(Clone, Debug)]
pub struct FieldRng {
    inner: SmallRng,
}

impl FieldRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed from the platform entropy source (`crypto.getRandomValues` in
    /// the browser). Falls back to the clock if entropy is unavailable.
    pub fn from_entropy() -> Self {
        Self::seeded(entropy_seed())
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform in `[-0.5, 0.5)`, the centred jitter used all over the layouts.
    #[inline]
    pub fn centered(&mut self) -> f32 {
        self.unit() - 0.5
    }

    /// Uniform in `[lo, hi)`; returns `lo` for an empty or inverted range.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.inner.random_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform index in `0..n`; 0 when `n == 0`.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.inner.random_range(0..n)
        }
    }

    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.unit() * TAU
    }
}

fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            warn!(error = %e, "Entropy unavailable, seeding from clock");
            (crate::time::now_seconds() * 1_000_000.0) as u64 ^ 0x9e37_79b9_7f4a_7c15
        }
    }
}
