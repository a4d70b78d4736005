//! Per-instance engine state
//!
//! A `FieldHandle` owns one field, its proximity graph, and the renderers
//! configured for it. Each host container gets its own handle; handles
//! share nothing.
//!
//! Per frame: step -> rebuild graph (if the interval elapsed) -> re-test
//! hover -> draw.

use tracing::{debug, info};

use crate::core::config::FieldConfig;
use crate::core::field::ParticleField;
use crate::core::graph::ProximityGraph;
use crate::core::hover::hit_test;
use crate::core::math::Vec2;
use crate::error::ConfigError;
use crate::render::{Frame, SceneRenderer, StyleRenderer, StyleSink, Surface};
use crate::time::Interval;

pub struct FieldHandle {
    field: ParticleField,
    graph: Option<ProximityGraph>,
    rebuild: Interval,
    scene: SceneRenderer,
    styles: StyleRenderer,
    pick_radius: f32,
    hovered: Option<usize>,
    active: bool,
    /// Host time of the latest tick, drives effects between ticks.
    time: f64,
    rebuilds: u64,
}

impl FieldHandle {
    /// Build a handle from `config` (sanitized first). The graph is built
    /// once immediately.
    pub fn create(config: &FieldConfig) -> Self {
        let field = ParticleField::new(config);
        let config = field.config().clone();

        let mut handle = Self {
            graph: config.connections.as_ref().map(ProximityGraph::new),
            rebuild: Interval::new(config.connections.map_or(f64::INFINITY, |c| c.rebuild_interval)),
            scene: SceneRenderer::new(&config),
            styles: StyleRenderer::new(&config),
            pick_radius: config.pick_radius,
            hovered: None,
            active: true,
            time: 0.0,
            rebuilds: 0,
            field,
        };
        handle.rebuild_graph();

        info!(
            count = handle.field.particles().len(),
            connections = handle.graph.is_some(),
            "Field handle created"
        );
        handle
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::create(&FieldConfig::from_json(json)?))
    }

    /// Advance one frame and draw it. Returns `false` (and does nothing)
    /// once the handle was destroyed.
    pub fn tick(&mut self, now: f64, surface: &mut dyn Surface) -> bool {
        if !self.advance(now) {
            return false;
        }
        self.draw(surface);
        true
    }

    /// The simulation half of `tick`, for hosts that render through a
    /// `StyleSink` instead of a surface.
    pub fn advance(&mut self, now: f64) -> bool {
        if !self.active {
            return false;
        }
        self.time = now;
        self.field.step();

        if self.graph.is_some() && self.rebuild.poll(now) {
            self.rebuild_graph();
        }
        // Nodes keep moving under a resting pointer
        if self.field.pointer().is_some() {
            self.update_hover();
        }
        true
    }

    /// Paint the current state without stepping.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let frame = Frame {
            particles: self.field.particles(),
            edges: self.graph.as_ref().map(|g| g.edges()).unwrap_or(&[]),
            time: self.time,
        };
        self.scene.draw(surface, &frame);
    }

    pub fn draw_styles(&self, sink: &mut dyn StyleSink) {
        self.styles.draw(sink, self.field.particles(), &self.field.bounds());
    }

    /// New container size; the graph is rebuilt right away.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.active {
            return;
        }
        self.field.resize(width, height);
        self.rebuild_graph();
        if self.field.pointer().is_some() {
            self.update_hover();
        }
    }

    /// Pointer moved to container-local `(x, y)`.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.active {
            return;
        }
        self.field.set_pointer(Some(Vec2::new(x, y)));
        self.update_hover();
    }

    pub fn pointer_leave(&mut self) {
        if !self.active {
            return;
        }
        self.field.set_pointer(None);
        self.set_hovered(None);
    }

    /// Stop the handle for good; later calls are no-ops.
    pub fn destroy(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.field.set_pointer(None);
        self.set_hovered(None);
        info!(frames = self.field.frame(), "Field handle destroyed");
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn graph(&self) -> Option<&ProximityGraph> {
        self.graph.as_ref()
    }

    #[inline]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Graph rebuilds since creation.
    #[inline]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    fn rebuild_graph(&mut self) {
        if let Some(graph) = &mut self.graph {
            graph.rebuild(self.field.particles());
            self.rebuilds += 1;
            debug!(edges = graph.edges().len(), frame = self.field.frame(), "Connections rebuilt");
        }
    }

    fn update_hover(&mut self) {
        let hovered = match self.field.pointer() {
            Some(pointer) if self.pick_radius > 0.0 => {
                hit_test(self.field.particles(), pointer, self.pick_radius)
            }
            _ => None,
        };
        self.set_hovered(hovered);
    }

    fn set_hovered(&mut self, hovered: Option<usize>) {
        if hovered != self.hovered {
            debug!(from = ?self.hovered, to = ?hovered, "Hover changed");
            self.hovered = hovered;
        }
        self.field.set_hovered(hovered);
    }
}
