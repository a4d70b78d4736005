//! DOM pellets: one absolutely positioned `div.pellet` per particle

use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::js_error;
use crate::error::HostError;
use crate::render::{ElementStyle, StyleSink};

pub struct PelletLayer {
    pellets: Vec<HtmlElement>,
    /// Last style written per pellet, to skip unchanged properties.
    applied: Vec<Option<ElementStyle>>,
}

impl PelletLayer {
    /// Append `count` pellet elements to `layer`.
    pub fn new(layer: &HtmlElement, count: usize) -> Result<Self, HostError> {
        let document = super::document()?;
        let mut pellets = Vec::with_capacity(count);

        for _ in 0..count {
            let el = document
                .create_element("div")
                .map_err(js_error)?
                .dyn_into::<HtmlElement>()
                .map_err(|_| HostError::WrongElementType {
                    id: "pellet".to_string(),
                    expected: "div",
                })?;
            el.set_class_name("pellet");
            let style = el.style();
            style.set_property("position", "absolute").map_err(js_error)?;
            style.set_property("border-radius", "50%").map_err(js_error)?;
            style.set_property("pointer-events", "none").map_err(js_error)?;
            style.set_property("transform", "translate(-50%, -50%)").map_err(js_error)?;
            layer.append_child(&el).map_err(js_error)?;
            pellets.push(el);
        }

        Ok(Self {
            applied: vec![None; pellets.len()],
            pellets,
        })
    }

    /// Detach every pellet from the page.
    pub fn remove(&mut self) {
        for el in self.pellets.drain(..) {
            el.remove();
        }
        self.applied.clear();
    }
}

impl StyleSink for PelletLayer {
    fn apply(&mut self, index: usize, next: &ElementStyle) {
        let (Some(el), Some(slot)) = (self.pellets.get(index), self.applied.get_mut(index)) else {
            return;
        };
        let style = el.style();
        let prev = slot.replace(*next);

        // Style writes only fail on read-only declarations
        let _ = style.set_property("left", &format!("{:.3}%", next.left_percent));
        let _ = style.set_property("top", &format!("{:.3}%", next.top_percent));

        if prev.map_or(true, |p| p.size != next.size) {
            let px = format!("{:.1}px", next.size);
            let _ = style.set_property("width", &px);
            let _ = style.set_property("height", &px);
        }
        if prev.map_or(true, |p| p.color != next.color) {
            let _ = style.set_property("background", &next.color.to_css());
        }
    }
}
