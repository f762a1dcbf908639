#![cfg(target_arch = "wasm32")]

mod dom;
mod events;
mod frame;
mod loader;
mod render;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use crest_core::assets;
use crest_core::load::LoadLifecycle;
use crest_core::ViewerState;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use frame::FrameContext;
use loader::LoadingOverlay;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("crest-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    // The storefront never depends on the viewer; it is wired first so a
    // missing canvas or a failed load leaves the rest of the page alive.
    let _storefront = ui::Storefront::wire(&document);

    let Some(canvas) = document
        .get_element_by_id("logoCanvas")
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    else {
        log::warn!("missing #logoCanvas; skipping 3D viewer");
        return Ok(());
    };

    let dpr = window.device_pixel_ratio();
    let (width, height) = dom::sync_canvas_backing_size(&canvas, dpr);

    let viewer = Rc::new(RefCell::new(ViewerState::new(
        width as f32 / height.max(1) as f32,
    )));
    events::wire_pointer_input(&canvas, viewer.clone());
    events::wire_resize(&canvas, viewer.clone(), dpr);
    events::wire_reduced_motion(viewer.clone());

    let gpu = frame::init_gpu(&canvas).await;
    let gpu_available = gpu.is_some();
    let halted = Rc::new(RefCell::new(false));
    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        viewer: viewer.clone(),
        gpu,
        canvas: canvas.clone(),
        dpr,
        halted: halted.clone(),
    }));
    frame::start_loop(frame_ctx.clone());

    let overlay = LoadingOverlay::find(&document);
    let mut lifecycle = LoadLifecycle::new();

    if !gpu_available {
        if lifecycle.fail() {
            loader::swap_canvas_for_fallback(&document, &canvas);
            overlay.show_error(loader::DEFAULT_ERROR_TEXT);
            *halted.borrow_mut() = true;
        }
        return Ok(());
    }

    // Warm the Draco decoder while the fetch is still in flight.
    assets::prewarm_decoder().await;

    if let Some(p) = lifecycle.on_progress(0, 1) {
        overlay.report_percent(p);
    }
    let result = match loader::fetch_bytes(loader::MODEL_URL).await {
        Ok(bytes) => {
            if let Some(p) = lifecycle.on_progress(1, 1) {
                overlay.report_percent(p);
            }
            assets::parse_asset(&bytes).await.map_err(anyhow::Error::from)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(model) => {
            let framing = viewer.borrow_mut().install_model(model);
            {
                let viewer = viewer.borrow();
                let mut ctx = frame_ctx.borrow_mut();
                if let (Some(gpu), Some(model)) = (ctx.gpu.as_mut(), viewer.model.as_ref()) {
                    gpu.upload_model(model);
                }
            }
            lifecycle.succeed();
            overlay.hide(150);
            log::info!(
                "crest ready: distance {:.2}, lift {:.2}",
                framing.distance,
                framing.model_lift
            );
        }
        Err(e) => {
            log::error!("crest load failed: {:?}", e);
            if lifecycle.fail() {
                loader::swap_canvas_for_fallback(&document, &canvas);
                overlay.show_error(loader::LOAD_ERROR_TEXT);
                *halted.borrow_mut() = true;
            }
        }
    }
    Ok(())
}
