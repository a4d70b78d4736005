//! Mounting a field onto the page: animation loop, listeners, JS handle

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent};

use super::{element_by_id, js_error, CanvasSurface, PelletLayer};
use crate::core::config::{FieldConfig, Preset};
use crate::core::math::Bounds;
use crate::error::HostError;
use crate::handle::FieldHandle;
use crate::time::now_seconds;

enum Target {
    Canvas(CanvasSurface),
    Pellets { container: HtmlElement, layer: PelletLayer },
}

/// State shared between the JS handle, the frame callback and listeners.
struct Mounted {
    handle: FieldHandle,
    target: Target,
}

impl Mounted {
    fn frame(&mut self, now: f64) -> bool {
        match &mut self.target {
            Target::Canvas(surface) => self.handle.tick(now, surface),
            Target::Pellets { layer, .. } => {
                if !self.handle.advance(now) {
                    return false;
                }
                self.handle.draw_styles(layer);
                true
            }
        }
    }

    fn element(&self) -> &Element {
        match &self.target {
            Target::Canvas(surface) => surface.canvas().as_ref(),
            Target::Pellets { container, .. } => container.as_ref(),
        }
    }

    /// Map client coordinates into field coordinates.
    fn pointer_at(&mut self, client_x: f64, client_y: f64) {
        let rect = self.element().get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let bounds = self.handle.field().bounds();
        let x = ((client_x - rect.left()) / rect.width()) as f32 * bounds.width;
        let y = ((client_y - rect.top()) / rect.height()) as f32 * bounds.height;
        self.handle.pointer_move(x, y);
    }

    /// Host-requested size. A canvas resizes its backing store first so
    /// drawing and the field agree on the bounds.
    fn resize(&mut self, width: f32, height: f32) {
        match &mut self.target {
            Target::Canvas(surface) => match surface.set_size(width as f64, height as f64) {
                Ok(size) => self.handle.resize(size.x, size.y),
                Err(e) => warn!(error = %e, "Canvas resize failed"),
            },
            Target::Pellets { .. } => self.handle.resize(width, height),
        }
    }

    /// Window resized: canvases follow their container, pellets live on a
    /// percentage plane and need nothing.
    fn fit(&mut self) {
        if let Target::Canvas(surface) = &mut self.target {
            match surface.fit_to_container() {
                Ok(size) => self.handle.resize(size.x, size.y),
                Err(e) => warn!(error = %e, "Canvas resize failed"),
            }
        }
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// JS-facing handle of a mounted field.
#[wasm_bindgen(js_name = FieldHandle)]
pub struct WebField {
    state: Rc<RefCell<Mounted>>,
    frame_callback: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen(js_class = FieldHandle)]
impl WebField {
    /// Advance and draw one frame by hand (the loop already does this).
    pub fn tick(&self) -> bool {
        self.state.borrow_mut().frame(now_seconds())
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.state.borrow_mut().resize(width, height);
    }

    /// Pointer at container-local field coordinates.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.state.borrow_mut().handle.pointer_move(x, y);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) {
        self.state.borrow_mut().handle.pointer_leave();
    }

    /// Stop the loop, detach listeners, and remove created elements.
    pub fn destroy(&mut self) {
        self.teardown();
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.state.borrow().handle.is_active()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.state.borrow().handle.field().particles().len()
    }
}

impl WebField {
    fn new(mounted: Mounted) -> Self {
        Self {
            state: Rc::new(RefCell::new(mounted)),
            frame_callback: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        }
    }

    fn listen(
        &mut self,
        target: EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), HostError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.push(Listener { target, kind, callback });
        Ok(())
    }

    fn attach_listeners(&mut self) -> Result<(), HostError> {
        let element: EventTarget = self.state.borrow().element().clone().into();

        let state = self.state.clone();
        self.listen(element.clone(), "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                if let Ok(mut m) = state.try_borrow_mut() {
                    m.pointer_at(mouse.client_x() as f64, mouse.client_y() as f64);
                }
            }
        })?;

        let state = self.state.clone();
        self.listen(element, "mouseleave", move |_| {
            if let Ok(mut m) = state.try_borrow_mut() {
                m.handle.pointer_leave();
            }
        })?;

        let state = self.state.clone();
        self.listen(super::window()?.into(), "resize", move |_| {
            if let Ok(mut m) = state.try_borrow_mut() {
                m.fit();
            }
        })
    }

    fn start_loop(&mut self) -> Result<(), HostError> {
        let window = super::window()?;
        let state = self.state.clone();
        let callback = self.frame_callback.clone();
        let frame_id = self.frame_id.clone();

        let closure = Closure::wrap(Box::new(move || {
            frame_id.set(None);
            let running = match state.try_borrow_mut() {
                Ok(mut m) => m.frame(now_seconds()),
                Err(_) => true,
            };
            if !running {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(cb) = callback.borrow().as_ref() {
                match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(Some(id)),
                    Err(e) => error!(?e, "requestAnimationFrame failed"),
                }
            }
        }) as Box<dyn FnMut()>);

        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.frame_id.set(Some(id));
        *self.frame_callback.borrow_mut() = Some(closure);
        Ok(())
    }

    fn teardown(&mut self) {
        if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the callback's reference to itself
        self.frame_callback.borrow_mut().take();

        for l in self.listeners.drain(..) {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.callback.as_ref().unchecked_ref());
        }

        if let Ok(mut m) = self.state.try_borrow_mut() {
            m.handle.destroy();
            if let Target::Pellets { layer, .. } = &mut m.target {
                layer.remove();
            }
        }
    }
}

impl Drop for WebField {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn parse_config(json: Option<String>, fallback: Preset) -> Result<FieldConfig, HostError> {
    match json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => Ok(FieldConfig::from_json(json)?),
        _ => Ok(FieldConfig::preset(fallback)),
    }
}

fn mount_canvas_inner(canvas_id: &str, config_json: Option<String>) -> Result<WebField, HostError> {
    let canvas: HtmlCanvasElement = element_by_id(canvas_id, "canvas")?;
    let mut config = parse_config(config_json, Preset::Network)?;

    let mut surface = CanvasSurface::new(canvas, canvas_id)?;
    let size = surface.fit_to_container()?;
    config.bounds = Bounds::new(size.x, size.y);

    let handle = FieldHandle::create(&config);
    let mut web = WebField::new(Mounted {
        handle,
        target: Target::Canvas(surface),
    });
    web.attach_listeners()?;
    web.start_loop()?;

    info!(canvas = canvas_id, width = size.x, height = size.y, "Field mounted on canvas");
    Ok(web)
}

fn mount_pellets_inner(
    container_id: &str,
    layer_id: &str,
    config_json: Option<String>,
) -> Result<WebField, HostError> {
    let container: HtmlElement = element_by_id(container_id, "element")?;
    let layer_el: HtmlElement = element_by_id(layer_id, "element")?;
    let config = parse_config(config_json, Preset::Pellets)?;

    let handle = FieldHandle::create(&config);
    let layer = PelletLayer::new(&layer_el, handle.field().particles().len())?;
    let mut web = WebField::new(Mounted {
        handle,
        target: Target::Pellets { container, layer },
    });
    web.attach_listeners()?;
    web.start_loop()?;

    info!(container = container_id, "Pellets mounted");
    Ok(web)
}

/// Start a canvas scene on `<canvas id=canvas_id>`. `config_json` is an
/// optional JSON config (defaults to the network preset).
///
/// Returns `undefined` instead of throwing when the page lacks what the
/// scene needs.
#[wasm_bindgen(js_name = mountCanvas)]
pub fn mount_canvas(canvas_id: &str, config_json: Option<String>) -> Option<WebField> {
    match mount_canvas_inner(canvas_id, config_json) {
        Ok(web) => Some(web),
        Err(e) => {
            warn!(canvas = canvas_id, error = %e, "Particle field disabled");
            None
        }
    }
}

/// Start the pellet scene: pointer events come from `container_id`, pellet
/// elements are appended to `layer_id` (defaults to the pellets preset).
#[wasm_bindgen(js_name = mountPellets)]
pub fn mount_pellets(container_id: &str, layer_id: &str, config_json: Option<String>) -> Option<WebField> {
    match mount_pellets_inner(container_id, layer_id, config_json) {
        Ok(web) => Some(web),
        Err(e) => {
            warn!(container = container_id, error = %e, "Pellets disabled");
            None
        }
    }
}
