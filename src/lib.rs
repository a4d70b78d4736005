//! Particle field - decorative 2D particle scenes for canvas and DOM hosts
//!
//! One configurable engine behind three scene variants:
//! - `network`: nodes orbiting a centre, linked by a proximity graph, with
//!   hover highlighting and pulse effects
//! - `stream`: glyphs and photo cards falling from a cone into the centre
//! - `pellets`: drifting dots pushed around by the pointer, rendered as
//!   positioned DOM elements
//!
//! The core (`core`) is platform-agnostic; `handle::FieldHandle` ties a
//! field, its graph and renderers together. The browser glue lives in `web`
//! (feature `wasm`) and the headless runner in the `field-cli` binary
//! (feature `cli`).

pub mod core;
pub mod error;
pub mod handle;
pub mod render;
pub mod theme;
pub mod time;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod web;

pub use crate::core::{Bounds, FieldConfig, ParticleField, Preset, ProximityGraph};
pub use error::{ConfigError, HostError};
pub use handle::FieldHandle;
pub use render::{RecordingSurface, SceneRenderer, StyleRenderer, Surface};

/// Module start hook: panic messages and tracing go to the browser console.
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
