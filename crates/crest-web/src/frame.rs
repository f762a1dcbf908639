//! The requestAnimationFrame loop. Scheduling lives here; all per-frame
//! logic lives in `crest_core::ViewerState::tick` so it stays testable.

use std::cell::RefCell;
use std::rc::Rc;

use crest_core::ViewerState;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::render::GpuState;

pub struct FrameContext {
    pub viewer: Rc<RefCell<ViewerState>>,
    pub gpu: Option<GpuState<'static>>,
    pub canvas: web::HtmlCanvasElement,
    /// Device pixel ratio, read once at startup.
    pub dpr: f64,
    /// Set when the canvas has been replaced by the load-failure fallback;
    /// the loop keeps running but stops touching the dead surface.
    pub halted: Rc<RefCell<bool>>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        if *self.halted.borrow() {
            return;
        }

        // The container may resize without a resize event reaching us first,
        // so the backing size is reconciled every frame.
        let (w, h) = dom::sync_canvas_backing_size(&self.canvas, self.dpr);

        let mut viewer = self.viewer.borrow_mut();
        viewer.set_aspect(w as f32, h as f32);
        viewer.tick();

        if let Some(gpu) = &mut self.gpu {
            gpu.resize_if_needed(w, h);
            if let Err(e) = gpu.render(&viewer.camera, viewer.model.as_ref()) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for the surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}
