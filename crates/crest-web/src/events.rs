//! Viewer input wiring: cursor tilt tracking, the orbit drag gesture, wheel
//! dolly, window resize and the reduced-motion media query.

use std::cell::RefCell;
use std::rc::Rc;

use crest_core::ViewerState;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

/// Normalized cursor position over the canvas rect, [-1, 1] per axis.
fn cursor_from_event(canvas: &web::HtmlCanvasElement, ev: &web::MouseEvent) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width().max(1.0);
    let h = rect.height().max(1.0);
    let x = ((ev.client_x() as f64 - rect.left()) / w - 0.5) * 2.0;
    let y = ((ev.client_y() as f64 - rect.top()) / h - 0.5) * 2.0;
    Vec2::new(x as f32, y as f32)
}

pub fn wire_pointer_input(canvas: &web::HtmlCanvasElement, viewer: Rc<RefCell<ViewerState>>) {
    let Some(window) = web::window() else {
        return;
    };

    // Cursor tilt follows the pointer anywhere on the page, like the source
    // page's window-level mousemove.
    {
        let canvas = canvas.clone();
        let viewer = viewer.clone();
        dom::listen_mouse(&window, "mousemove", move |ev| {
            let cursor = cursor_from_event(&canvas, &ev);
            viewer.borrow_mut().set_cursor(cursor);
        });
    }

    // Orbit drag: down on the canvas starts the gesture; move/up anywhere
    // continues and ends it so drags can leave the canvas.
    let last_pos: Rc<RefCell<Option<(f32, f32)>>> = Rc::new(RefCell::new(None));
    {
        let viewer = viewer.clone();
        let last_pos = last_pos.clone();
        dom::listen_pointer(canvas, "pointerdown", move |ev| {
            viewer.borrow_mut().orbit.begin_drag();
            *last_pos.borrow_mut() = Some((ev.client_x() as f32, ev.client_y() as f32));
            ev.prevent_default();
        });
    }
    {
        let canvas = canvas.clone();
        let viewer = viewer.clone();
        let last_pos = last_pos.clone();
        dom::listen_pointer(&window, "pointermove", move |ev| {
            let mut last = last_pos.borrow_mut();
            let Some((lx, ly)) = *last else {
                return;
            };
            let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
            *last = Some((x, y));
            let height = canvas.client_height().max(1) as f32;
            viewer
                .borrow_mut()
                .orbit
                .rotate_delta(x - lx, y - ly, height);
        });
    }
    for kind in ["pointerup", "pointercancel"] {
        let viewer = viewer.clone();
        let last_pos = last_pos.clone();
        dom::listen_pointer(&window, kind, move |_ev| {
            if last_pos.borrow_mut().take().is_some() {
                viewer.borrow_mut().orbit.end_drag();
            }
        });
    }

    // Wheel dolly within the clamped distance range.
    {
        let viewer = viewer.clone();
        dom::listen_event(canvas, "wheel", move |ev| {
            if let Some(wheel) = ev.dyn_ref::<web::WheelEvent>() {
                let factor = (1.0 + wheel.delta_y() as f32 * 0.001).clamp(0.5, 2.0);
                viewer.borrow_mut().orbit.dolly(factor);
                ev.prevent_default();
            }
        });
    }
}

pub fn wire_resize(canvas: &web::HtmlCanvasElement, viewer: Rc<RefCell<ViewerState>>, dpr: f64) {
    let Some(window) = web::window() else {
        return;
    };
    let canvas = canvas.clone();
    dom::listen(&window, "resize", move || {
        let (w, h) = dom::sync_canvas_backing_size(&canvas, dpr);
        viewer.borrow_mut().set_aspect(w as f32, h as f32);
    });
}

/// Mirror `(prefers-reduced-motion: reduce)` into the viewer, subscribed for
/// change rather than read once.
pub fn wire_reduced_motion(viewer: Rc<RefCell<ViewerState>>) {
    let Some(window) = web::window() else {
        return;
    };
    let Ok(Some(mql)) = window.match_media("(prefers-reduced-motion: reduce)") else {
        return;
    };
    viewer.borrow_mut().set_reduced_motion(mql.matches());
    let mql_for_change = mql.clone();
    dom::listen(&mql, "change", move || {
        viewer
            .borrow_mut()
            .set_reduced_motion(mql_for_change.matches());
    });
}
