// driver.rs - Browser entry points and requestAnimationFrame loops
//
// One FrameLoop per layer. The loop owns its closures; the closures only
// hold a Weak back-reference, so dropping the handle tears everything down.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use crate::settings::SceneSettings;
use crate::sim::{Layer, Snowfield, TreeWorld};
use crate::surface::{CanvasSurface, Surface};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-engine ready");
}

struct FrameLoop<L: Layer + 'static> {
    layer: RefCell<L>,
    surface: RefCell<CanvasSurface>,
    running: Cell<bool>,
    frame_id: Cell<Option<i32>>,
    on_frame: RefCell<Option<Closure<dyn FnMut()>>>,
    on_resize: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl<L: Layer + 'static> FrameLoop<L> {
    fn start(layer: L, surface: CanvasSurface) -> Result<Rc<Self>, JsValue> {
        let window = window()?;
        let this = Rc::new(Self {
            layer: RefCell::new(layer),
            surface: RefCell::new(surface),
            running: Cell::new(true),
            frame_id: Cell::new(None),
            on_frame: RefCell::new(None),
            on_resize: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&this);
        *this.on_frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(this) = weak.upgrade() {
                this.frame();
            }
        }) as Box<dyn FnMut()>));

        let weak: Weak<Self> = Rc::downgrade(&this);
        let on_resize = Closure::wrap(Box::new(move || {
            if let Some(this) = weak.upgrade() {
                this.resize();
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        *this.on_resize.borrow_mut() = Some(on_resize);

        log::info!("{} loop started", this.layer.borrow().name());
        this.schedule(&window);
        Ok(this)
    }

    fn frame(&self) {
        if !self.running.get() {
            return;
        }

        let now = js_sys::Date::now();
        let result = self.layer.borrow_mut().tick(&mut *self.surface.borrow_mut(), now);
        if let Err(e) = result {
            log::error!("{} frame failed: {}", self.layer.borrow().name(), e);
        }

        match window() {
            Ok(window) => self.schedule(&window),
            Err(e) => log::error!("no window to schedule next frame: {e:?}"),
        }
    }

    fn schedule(&self, window: &Window) {
        let on_frame = self.on_frame.borrow();
        let Some(cb) = on_frame.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.frame_id.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn resize(&self) {
        let Ok(window) = window() else {
            return;
        };
        let (w, h) = fit_to_window(&window, &self.surface.borrow());
        log::info!("{} resized to {}x{}", self.layer.borrow().name(), w, h);
        self.layer.borrow_mut().resize(w as f32, h as f32);
    }

    fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }

        let on_frame = self.on_frame.borrow_mut().take();
        let on_resize = self.on_resize.borrow_mut().take();

        if let Ok(window) = window() {
            if let Some(id) = self.frame_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(cb) = on_resize.as_ref() {
                let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
            }
        }

        drop(on_frame);
        drop(on_resize);
        log::info!("{} loop stopped", self.layer.borrow().name());
    }
}

impl<L: Layer + 'static> Drop for FrameLoop<L> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Size the canvas to the viewport; returns the new size.
fn fit_to_window(window: &Window, surface: &CanvasSurface) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32;
    let (w, h) = (dim(window.inner_width()), dim(window.inner_height()));
    surface.set_size(w, h);
    (w, h)
}

fn seed() -> u32 {
    let t = js_sys::Date::now() as u64 as u32;
    let r = (js_sys::Math::random() * u32::MAX as f64) as u32;
    t ^ r
}

fn acquire(canvas: &HtmlCanvasElement) -> Option<CanvasSurface> {
    let surface = match CanvasSurface::from_canvas(canvas) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("{e}; animation not started");
            return None;
        }
    };
    let window = web_sys::window()?;
    fit_to_window(&window, &surface);
    Some(surface)
}

/// Handle to a running tree scene
#[wasm_bindgen]
pub struct SceneHandle {
    inner: Option<Rc<FrameLoop<TreeWorld>>>,
}

#[wasm_bindgen]
impl SceneHandle {
    pub fn stop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|l| l.running.get())
    }

    /// Apply new settings; a particle count change rebuilds the tree.
    pub fn set_settings(&self, settings: &SceneSettings) -> Result<(), JsValue> {
        settings.validate()?;
        if let Some(inner) = &self.inner {
            inner.layer.borrow_mut().apply_settings(*settings);
        }
        Ok(())
    }
}

#[wasm_bindgen]
pub fn start_scene(canvas: &HtmlCanvasElement, settings: &SceneSettings) -> Result<SceneHandle, JsValue> {
    settings.validate()?;

    let Some(surface) = acquire(canvas) else {
        return Ok(SceneHandle { inner: None });
    };
    let world = TreeWorld::new(surface.width(), surface.height(), *settings, seed());
    let inner = FrameLoop::start(world, surface)?;
    Ok(SceneHandle { inner: Some(inner) })
}

/// Handle to a running snowfall overlay
#[wasm_bindgen]
pub struct SnowHandle {
    inner: Option<Rc<FrameLoop<Snowfield>>>,
}

#[wasm_bindgen]
impl SnowHandle {
    pub fn stop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|l| l.running.get())
    }
}

#[wasm_bindgen]
pub fn start_snowfall(canvas: &HtmlCanvasElement) -> Result<SnowHandle, JsValue> {
    let Some(surface) = acquire(canvas) else {
        return Ok(SnowHandle { inner: None });
    };
    let snow = Snowfield::new(surface.width(), surface.height(), seed());
    let inner = FrameLoop::start(snow, surface)?;
    Ok(SnowHandle { inner: Some(inner) })
}
