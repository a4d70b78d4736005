//! Browser host glue (wasm32 + feature `wasm`)
//!
//! Everything here fails soft: a missing element or context is logged and
//! the effect is simply not started.

mod canvas;
mod dom;
mod mount;

pub use canvas::CanvasSurface;
pub use dom::PelletLayer;
pub use mount::{mount_canvas, mount_pellets, WebField};

use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::error::HostError;

fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

fn document() -> Result<Document, HostError> {
    window()?.document().ok_or(HostError::NoWindow)
}

/// Element by id, cast to the concrete DOM type.
fn element_by_id<T: JsCast>(id: &str, expected: &'static str) -> Result<T, HostError> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| HostError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| HostError::WrongElementType { id: id.to_string(), expected })
}

fn js_error(value: wasm_bindgen::JsValue) -> HostError {
    HostError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
