#![deny(unsafe_code)]
//! Browser host for the plexus point field.
//!
//! [`PlexusHandle::mount`] binds a field to an HTML canvas: it draws through the
//! canvas 2D context, listens to window `mousemove`/`scroll`/`resize`, and
//! drives [`Plexus::tick`] from `requestAnimationFrame`. [`PlexusHandle::unmount`]
//! (or dropping the handle) cancels the pending frame and removes every listener.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use plexus_core::{DVec2, FieldConfig, PlexusError, Rgba, Surface};
use plexus_field::{InputCapability, InputEvent, Plexus};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, Window};

/// A canvas element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Fails with `SurfaceUnavailable` when the canvas yields no 2D context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, PlexusError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| PlexusError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| PlexusError::SurfaceUnavailable("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PlexusError::SurfaceUnavailable("context is not a 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        // arc only fails for a negative radius
        if self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }
}

type Shared = Rc<RefCell<Plexus<CanvasSurface>>>;
type FrameCallback = Closure<dyn FnMut(f64)>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// A field mounted on a canvas, alive until [`unmount`](PlexusHandle::unmount) or drop.
#[wasm_bindgen]
pub struct PlexusHandle {
    plexus: Shared,
    window: Window,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    frame_request: Rc<Cell<Option<i32>>>,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

#[wasm_bindgen]
impl PlexusHandle {
    /// Mounts on `canvas`, sized to the window.
    ///
    /// `touch` marks a touch-primary device, which gets no pointer tracking.
    /// `params_json` is an optional JSON object of field parameter overrides.
    pub fn mount(
        canvas: HtmlCanvasElement,
        touch: bool,
        params_json: Option<String>,
    ) -> Result<PlexusHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let (width, height) = window_size(&window)?;
        let params = match params_json {
            Some(text) => serde_json::from_str(&text).map_err(js_error)?,
            None => serde_json::json!({}),
        };
        let seed = seed_from_unit(js_sys::Math::random());
        let config = FieldConfig::from_json(width, height, seed, &params).map_err(js_error)?;

        let plexus = Plexus::mount_with(
            |_| CanvasSurface::from_canvas(canvas),
            config,
            InputCapability { touch },
        )
        .map_err(js_error)?;

        let mut handle = PlexusHandle {
            plexus: Rc::new(RefCell::new(plexus)),
            window,
            frame: Rc::new(RefCell::new(None)),
            frame_request: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        };
        if let Err(e) = handle.attach_listeners().and_then(|()| handle.start_frames()) {
            handle.teardown();
            return Err(e);
        }
        Ok(handle)
    }

    /// Stops drawing and motion and removes all listeners. Safe to call twice.
    pub fn unmount(&mut self) {
        self.teardown();
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.plexus.borrow().is_mounted()
    }

    #[wasm_bindgen(getter)]
    pub fn points(&self) -> usize {
        self.plexus.borrow().field().len()
    }
}

impl PlexusHandle {
    fn attach_listeners(&mut self) -> Result<(), JsValue> {
        let installed = self.plexus.borrow().listeners();

        if installed.pointer_move {
            let plexus = Rc::clone(&self.plexus);
            self.listen("mousemove", move |event: Event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    dispatch(
                        &plexus,
                        InputEvent::PointerMove {
                            x: mouse.page_x() as f64,
                            y: mouse.page_y() as f64,
                        },
                    );
                }
            })?;
        }
        if installed.scroll {
            let plexus = Rc::clone(&self.plexus);
            let window = self.window.clone();
            self.listen("scroll", move |_| {
                let offset_y = window.scroll_y().unwrap_or(0.0);
                dispatch(&plexus, InputEvent::Scroll { offset_y });
            })?;
        }
        if installed.resize {
            let plexus = Rc::clone(&self.plexus);
            let window = self.window.clone();
            self.listen("resize", move |_| match window_size(&window) {
                Ok((width, height)) => dispatch(&plexus, InputEvent::Resize { width, height }),
                Err(e) => warn!(error = ?e, "window size unavailable"),
            })?;
        }
        Ok(())
    }

    fn listen<F>(&mut self, kind: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        self.window
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push((kind, closure));
        Ok(())
    }

    /// The frame callback re-requests itself until the field reports `Stopped`.
    fn start_frames(&mut self) -> Result<(), JsValue> {
        let plexus = Rc::clone(&self.plexus);
        let slot = Rc::clone(&self.frame);
        let request = Rc::clone(&self.frame_request);
        let window = self.window.clone();
        let mut origin_ms: Option<f64> = None;

        let callback: FrameCallback = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            request.set(None);
            let origin = *origin_ms.get_or_insert(timestamp_ms);
            let report = match plexus.try_borrow_mut() {
                Ok(mut plexus) => plexus.tick((timestamp_ms - origin) / 1000.0),
                Err(_) => return,
            };
            if !report.status.reschedule() {
                return;
            }
            if let Some(next) = slot.borrow().as_ref() {
                match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                    Ok(id) => request.set(Some(id)),
                    Err(e) => warn!(error = ?e, "requestAnimationFrame failed"),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.frame_request.set(Some(id));
        *self.frame.borrow_mut() = Some(callback);
        Ok(())
    }

    fn teardown(&mut self) {
        if let Ok(mut plexus) = self.plexus.try_borrow_mut() {
            plexus.unmount();
        }
        if let Some(id) = self.frame_request.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!(error = ?e, "cancelAnimationFrame failed");
            }
        }
        // Dropping the callback breaks its self-reference cycle.
        self.frame.borrow_mut().take();
        for (kind, closure) in self.listeners.drain(..) {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            {
                warn!(kind, error = ?e, "removeEventListener failed");
            }
        }
    }
}

impl Drop for PlexusHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Events that arrive while a frame holds the field are dropped.
fn dispatch(plexus: &Shared, event: InputEvent) {
    if let Ok(mut plexus) = plexus.try_borrow_mut() {
        if let Err(e) = plexus.handle_event(event) {
            warn!(error = %e, ?event, "input event rejected");
        }
    }
}

fn window_size(window: &Window) -> Result<(f64, f64), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

/// Maps a `Math.random()` value in [0, 1) onto the full seed range.
fn seed_from_unit(unit: f64) -> u64 {
    (unit.clamp(0.0, 1.0) * u64::MAX as f64) as u64
}

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
