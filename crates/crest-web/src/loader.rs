//! One-shot model load: decoder pre-warm, fetch, decode, and the terminal
//! failure path that swaps the canvas for a static fallback.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::dom;

/// Fixed relative location of the crest asset; consumed once at startup.
pub const MODEL_URL: &str = "assets/crest.glb";

pub use crest_core::load::{DEFAULT_ERROR_TEXT, FALLBACK_TEXT, LOAD_ERROR_TEXT};

/// Optional loading-overlay hooks; page variants without the overlay still
/// load, they just report nothing.
pub struct LoadingOverlay {
    overlay: Option<web::Element>,
    progress: Option<web::Element>,
}

impl LoadingOverlay {
    pub fn find(document: &web::Document) -> Self {
        Self {
            overlay: dom::query(document, "[data-logo-loading]"),
            progress: dom::query(document, "[data-logo-progress]"),
        }
    }

    pub fn report_percent(&self, percent: u8) {
        dom::set_text(
            self.progress.as_ref(),
            &format!("Calibrating crest {percent}%"),
        );
    }

    /// Hide shortly after load so the last percentage is still legible.
    pub fn hide(&self, delay_ms: i32) {
        let Some(overlay) = self.overlay.clone() else {
            return;
        };
        if dom::has_class(&overlay, "hidden") {
            return;
        }
        dom::set_timeout(delay_ms, move || {
            dom::set_class(&overlay, "hidden", true);
        });
    }

    pub fn show_error(&self, message: &str) {
        dom::set_text(self.progress.as_ref(), message);
        if let Some(overlay) = &self.overlay {
            dom::set_class(overlay, "hidden", false);
        }
    }
}

/// Fetch the model bytes. Any network or HTTP failure is terminal.
pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch failed: {:?}", e))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("not a Response: {:?}", e))?;
    if !response.ok() {
        anyhow::bail!("fetch {} -> HTTP {}", url, response.status());
    }
    let buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow::anyhow!("array_buffer: {:?}", e))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("body read failed: {:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Replace the canvas with a static fallback element. Called at most once;
/// the lifecycle guard upstream guarantees that.
pub fn swap_canvas_for_fallback(document: &web::Document, canvas: &web::HtmlCanvasElement) {
    let Ok(fallback) = document.create_element("div") else {
        return;
    };
    fallback.set_class_name("three-fallback");
    fallback.set_text_content(Some(FALLBACK_TEXT));
    let _ = canvas.replace_with_with_node_1(&fallback);
}
