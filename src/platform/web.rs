//! Browser host
//!
//! Mounts an `Overlay` onto a `<canvas>`:
//! - one requestAnimationFrame callback, re-requested every frame
//! - pointer listeners on the canvas, resize listener on the window
//! - the mask draws into the canvas through its 2D context, the erasure
//!   strokes into an offscreen canvas
//!
//! `MountHandle::unmount` (or dropping the handle) cancels the pending frame
//! and detaches every listener, as tracked by `Lifecycle`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent};

use super::canvas::CanvasSurface;
use super::lifecycle::Lifecycle;
use crate::error::OverlayError;
use crate::overlay::{Overlay, OverlayEvent};
use crate::settings::OverlaySettings;

/// Canvas attribute holding JSON settings for the auto-mount
pub const SETTINGS_ATTRIBUTE: &str = "data-overlay";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything the frame loop and the listeners share
struct Mounted {
    overlay: Overlay<CanvasSurface>,
    canvas: HtmlCanvasElement,
    lifecycle: Lifecycle<Listener>,
}

impl Mounted {
    /// Client-space pointer position to canvas-local logical coordinates
    fn local_point(&self, event: &web_sys::Event) -> Option<Vec2> {
        let event = event.dyn_ref::<MouseEvent>()?;
        let rect = self.canvas.get_bounding_client_rect();
        Some(Vec2::new(
            (f64::from(event.client_x()) - rect.left()) as f32,
            (f64::from(event.client_y()) - rect.top()) as f32,
        ))
    }

    /// CSS size in logical pixels; the backing store is sized by the overlay
    fn sync_canvas_size(&self) {
        let viewport = self.overlay.viewport();
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));
    }

    fn resize_to_window(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let (width, height) = window_size(&window);
        self.overlay.handle_event(OverlayEvent::Resize {
            width,
            height,
            pixel_density: window.device_pixel_ratio() as f32,
        });
        self.sync_canvas_size();
    }

    fn frame(&mut self, time: f64) {
        // Density changes (zoom, moving to another monitor) arrive without a
        // resize event
        if let Some(window) = web_sys::window() {
            let density = window.device_pixel_ratio() as f32;
            let current = self.overlay.viewport().pixel_density;
            if density.is_finite() && density > 0.0 && (density - current).abs() > f32::EPSILON {
                log::info!("Pixel density changed: {current} -> {density}");
                self.resize_to_window();
            }
        }

        self.overlay.render(time);
    }
}

/// A listener attached to a target, detachable later
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

fn listen<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Listener, OverlayError>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(|_| OverlayError::Listener(kind.to_string()))?;
    Ok(Listener {
        target: target.clone(),
        kind,
        closure,
    })
}

fn pointer_listener(
    canvas: &HtmlCanvasElement,
    kind: &'static str,
    state: &Rc<RefCell<Mounted>>,
    to_event: fn(Vec2) -> OverlayEvent,
) -> Result<Listener, OverlayError> {
    let state = Rc::clone(state);
    listen(canvas.as_ref(), kind, move |event| {
        let mut s = state.borrow_mut();
        if let Some(p) = s.local_point(&event) {
            s.overlay.handle_event(to_event(p));
        }
    })
}

fn release_listener(
    canvas: &HtmlCanvasElement,
    kind: &'static str,
    state: &Rc<RefCell<Mounted>>,
    event: OverlayEvent,
) -> Result<Listener, OverlayError> {
    let state = Rc::clone(state);
    listen(canvas.as_ref(), kind, move |_| {
        state.borrow_mut().overlay.handle_event(event);
    })
}

/// Hand `listener` to the lifecycle, detaching it if already torn down
fn track(state: &Rc<RefCell<Mounted>>, listener: Listener) {
    let refused = state.borrow_mut().lifecycle.attach(listener).err();
    if let Some(listener) = refused {
        listener.detach();
    }
}

fn cancel_frame(id: i32) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.cancel_animation_frame(id) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

fn window_size(window: &web_sys::Window) -> (f32, f32) {
    let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0) as f32;
    (extent(window.inner_width()), extent(window.inner_height()))
}

/// Owns a mounted overlay; dropping it unmounts
pub struct MountHandle {
    state: Rc<RefCell<Mounted>>,
    frame: FrameCallback,
}

impl MountHandle {
    pub fn is_mounted(&self) -> bool {
        self.state.borrow().overlay.is_mounted()
    }

    /// Cancel the pending frame, detach listeners, stop the overlay
    ///
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        let teardown = {
            let mut s = self.state.borrow_mut();
            s.overlay.unmount();
            s.lifecycle.teardown()
        };
        if let Some(id) = teardown.cancel_frame {
            cancel_frame(id);
        }
        self.frame.borrow_mut().take();
        for listener in teardown.listeners {
            listener.detach();
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount onto a canvas; fails if no 2D context can be acquired
pub fn mount(canvas: HtmlCanvasElement, settings: OverlaySettings) -> Result<MountHandle, OverlayError> {
    let window = web_sys::window().ok_or(OverlayError::NoWindow)?;
    let document = window.document().ok_or(OverlayError::NoWindow)?;
    let mask = CanvasSurface::new(canvas.clone())?;
    let accumulation = CanvasSurface::offscreen(&document)?;

    let (width, height) = window_size(&window);
    let overlay = Overlay::with_surfaces(
        settings,
        mask,
        accumulation,
        width,
        height,
        window.device_pixel_ratio() as f32,
    );
    // Touch drags erase instead of scrolling the page
    let _ = canvas.style().set_property("touch-action", "none");

    let state = Rc::new(RefCell::new(Mounted {
        overlay,
        canvas: canvas.clone(),
        lifecycle: Lifecycle::new(),
    }));
    state.borrow().sync_canvas_size();

    // On a failed attach the handle is dropped, detaching what was attached
    let handle = MountHandle {
        state: Rc::clone(&state),
        frame: Rc::new(RefCell::new(None)),
    };
    track(&state, pointer_listener(&canvas, "pointerdown", &state, OverlayEvent::PointerDown)?);
    track(&state, pointer_listener(&canvas, "pointermove", &state, OverlayEvent::PointerMove)?);
    track(&state, release_listener(&canvas, "pointerup", &state, OverlayEvent::PointerUp)?);
    track(&state, release_listener(&canvas, "pointerout", &state, OverlayEvent::PointerLeave)?);
    {
        let resize_state = Rc::clone(&state);
        let listener = listen(window.as_ref(), "resize", move |_| {
            resize_state.borrow_mut().resize_to_window();
        })?;
        track(&state, listener);
    }

    start_loop(&handle.state, &handle.frame);
    Ok(handle)
}

/// Look up `canvas_id` and mount with settings from `config_json` or the
/// canvas `data-overlay` attribute
pub fn mount_by_id(canvas_id: &str, config_json: Option<&str>) -> Result<MountHandle, OverlayError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(OverlayError::NoWindow)?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| OverlayError::CanvasNotFound(canvas_id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| OverlayError::NotACanvas(canvas_id.to_string()))?;

    let attribute = canvas.get_attribute(SETTINGS_ATTRIBUTE);
    let settings = OverlaySettings::from_json_or_default(config_json.or(attribute.as_deref()));
    mount(canvas, settings)
}

fn start_loop(state: &Rc<RefCell<Mounted>>, frame: &FrameCallback) {
    let loop_state = Rc::clone(state);
    let loop_frame = Rc::clone(frame);
    let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
        {
            let mut s = loop_state.borrow_mut();
            if !s.lifecycle.begin_frame() || !s.overlay.is_mounted() {
                return;
            }
            s.frame(time);
        }
        request_animation_frame(&loop_state, &loop_frame);
    });
    *frame.borrow_mut() = Some(callback);
    request_animation_frame(state, frame);
}

fn request_animation_frame(state: &Rc<RefCell<Mounted>>, frame: &FrameCallback) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let pending = frame.borrow();
    // Torn down between frames
    let Some(callback) = pending.as_ref() else {
        return;
    };
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => {
            if !state.borrow_mut().lifecycle.frame_requested(id) {
                cancel_frame(id);
            }
        }
        Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
    }
}

/// JS-facing handle returned by `mountOverlay`
#[wasm_bindgen]
pub struct OverlayHandle {
    inner: MountHandle,
}

#[wasm_bindgen]
impl OverlayHandle {
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }
}

/// Mount the overlay on the canvas with id `canvas_id`
#[wasm_bindgen(js_name = mountOverlay)]
pub fn mount_overlay(canvas_id: &str, config_json: Option<String>) -> Result<OverlayHandle, JsValue> {
    mount_by_id(canvas_id, config_json.as_deref())
        .map(|inner| OverlayHandle { inner })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
