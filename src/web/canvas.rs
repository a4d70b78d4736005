//! [`Surface`] over a canvas 2D context

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::js_error;
use crate::core::math::{Vec2, MAX_BOUND, MIN_BOUND};
use crate::error::HostError;
use crate::render::{Stroke, Surface};
use crate::theme::Rgba;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS pixel size; the backing store is `size * dpr`.
    size: Vec2,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, id: &str) -> Result<Self, HostError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| HostError::NoContext(id.to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::NoContext(id.to_string()))?;

        Ok(Self {
            canvas,
            ctx,
            size: Vec2::ONE,
        })
    }

    #[inline]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the canvas to its container at the device pixel ratio.
    /// Returns the new size in CSS pixels.
    pub fn fit_to_container(&mut self) -> Result<Vec2, HostError> {
        let rect = match self.canvas.parent_element() {
            Some(parent) => parent.get_bounding_client_rect(),
            None => self.canvas.get_bounding_client_rect(),
        };
        self.set_size(rect.width(), rect.height())
    }

    /// Resize to `width x height` CSS pixels; the backing store follows the
    /// device pixel ratio. Returns the size actually applied.
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<Vec2, HostError> {
        let dpr = super::window()?.device_pixel_ratio().max(1.0);
        let sane = |v: f64| {
            if v.is_finite() {
                v.clamp(MIN_BOUND as f64, MAX_BOUND as f64)
            } else {
                MIN_BOUND as f64
            }
        };
        let (w, h) = (sane(width), sane(height));

        self.canvas.set_width((w * dpr).round() as u32);
        self.canvas.set_height((h * dpr).round() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", w)).map_err(js_error)?;
        style.set_property("height", &format!("{}px", h)).map_err(js_error)?;
        // Resizing the backing store resets the transform
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).map_err(js_error)?;

        self.size = Vec2::new(w as f32, h as f32);
        Ok(self.size)
    }

    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        let (w, h) = (self.size.x as f64, self.size.y as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if color.a > 0.0 {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if self.circle_path(center, radius) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        if self.circle_path(center, radius) {
            self.ctx.set_stroke_style_str(&stroke.color.to_css());
            self.ctx.set_line_width(stroke.width as f64);
            self.ctx.stroke();
        }
    }

    fn polygon(&mut self, points: &[Vec2], fill: Rgba, stroke: Option<Stroke>) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&fill.to_css());
        self.ctx.fill();
        if let Some(stroke) = stroke {
            self.ctx.set_stroke_style_str(&stroke.color.to_css());
            self.ctx.set_line_width(stroke.width as f64);
            self.ctx.stroke();
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Rgba) {
        self.ctx.set_font(&format!("{:.0}px \"Courier New\", monospace", size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.to_css());
        // fill_text only fails on a detached context; nothing to recover
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
