//! Tolerant DOM access. Optional page elements are a normal configuration:
//! every helper no-ops when its hook is absent so page variants without a
//! given panel keep working.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn query(document: &web::Document, selector: &str) -> Option<web::Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let mut out = Vec::new();
    if let Ok(list) = document.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

#[inline]
pub fn set_text(el: Option<&web::Element>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

#[inline]
pub fn set_class(el: &web::Element, class: &str, on: bool) {
    let list = el.class_list();
    let _ = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
}

#[inline]
pub fn has_class(el: &web::Element, class: &str) -> bool {
    el.class_list().contains(class)
}

#[inline]
pub fn set_hidden(el: &web::Element, hidden: bool) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        html.set_hidden(hidden);
    }
}

pub fn listen(target: &web::EventTarget, kind: &str, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn listen_event(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(web::Event) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn listen_mouse(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(web::MouseEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::MouseEvent)>);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn listen_pointer(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(web::PointerEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn listen_keyboard(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(web::KeyboardEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::KeyboardEvent)>);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Keep the canvas backing store matched to its CSS size. The device pixel
/// ratio is read once at startup and passed in, capped inside
/// [`crest_core::backing_size`].
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, dpr: f64) -> (u32, u32) {
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = crest_core::backing_size(rect.width(), rect.height(), dpr);
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

/// One-shot timeout; the closure hands itself to the JS side and is freed
/// after it fires.
pub fn set_timeout(ms: i32, handler: impl FnOnce() + 'static) -> Option<i32> {
    let window = web::window()?;
    let cb = Closure::once_into_js(handler);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
        .ok()
}

pub fn clear_timeout(handle: Option<i32>) {
    if let (Some(w), Some(h)) = (web::window(), handle) {
        w.clear_timeout_with_handle(h);
    }
}

pub fn set_interval(ms: i32, mut handler: impl FnMut() + 'static) -> Option<i32> {
    let window = web::window()?;
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let handle = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms,
        )
        .ok();
    closure.forget();
    handle
}

pub fn clear_interval(handle: Option<i32>) {
    if let (Some(w), Some(h)) = (web::window(), handle) {
        w.clear_interval_with_handle(h);
    }
}
