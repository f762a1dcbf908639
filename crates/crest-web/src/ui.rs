//! Storefront DOM wiring. All state lives in `crest_core::storefront`; this
//! module mirrors it into the page and routes delegated click events the way
//! the page's buttons expect.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crest_core::catalog::{filtered_products, format_usd, Filter, Product};
use crest_core::constants::{CAROUSEL_INTERVAL_MS, TOAST_FADE_MS, TOAST_VISIBLE_MS};
use crest_core::storefront::{
    toast_added, toast_filter, AdjustOutcome, Cart, Drawer, ModalLock, QuickView, TOAST_CHECKOUT,
    TOAST_CONTACT, TOAST_FOOTER, TOAST_REMOVED,
};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

pub struct Storefront {
    document: web::Document,

    product_grid: Option<web::Element>,
    filter_buttons: Vec<web::Element>,

    cart_panel: Option<web::Element>,
    cart_toggle: Option<web::Element>,
    cart_close: Option<web::Element>,
    cart_count: Option<web::Element>,
    cart_list: Option<web::Element>,
    cart_empty: Option<web::Element>,
    cart_total: Option<web::Element>,
    cart_note: Option<web::Element>,
    checkout: Option<web::Element>,

    toast_el: Option<web::Element>,
    featured_track: Option<web::Element>,

    quick_view_el: Option<web::Element>,
    quick_view_name: Option<web::Element>,
    quick_view_tag: Option<web::Element>,
    quick_view_desc: Option<web::Element>,
    quick_view_status: Option<web::Element>,
    quick_view_price: Option<web::Element>,

    drawer_el: Option<web::Element>,
    drawer_toggle: Option<web::Element>,
    drawer_backdrop: Option<web::Element>,

    cart: RefCell<Cart>,
    quick_view: RefCell<QuickView>,
    drawer: RefCell<Drawer>,
    modal_lock: RefCell<ModalLock>,

    toast_timer: Cell<Option<i32>>,
    toast_fade_timer: Cell<Option<i32>>,
    featured_timer: Cell<Option<i32>>,
}

impl Storefront {
    /// Locate the page hooks, attach every listener and paint the initial
    /// state. Absent hooks are a valid page variant; their features no-op.
    pub fn wire(document: &web::Document) -> Rc<Self> {
        let q = |sel: &str| dom::query(document, sel);
        let store = Rc::new(Self {
            document: document.clone(),
            product_grid: q("[data-products]"),
            filter_buttons: dom::query_all(document, "[data-filter]"),
            cart_panel: q("[data-cart]"),
            cart_toggle: q("[data-cart-toggle]"),
            cart_close: q("[data-cart-close]"),
            cart_count: q("[data-cart-count]"),
            cart_list: q("[data-cart-list]"),
            cart_empty: q("[data-cart-empty]"),
            cart_total: q("[data-cart-total]"),
            cart_note: q("[data-cart-note]"),
            checkout: q("[data-checkout]"),
            toast_el: q("[data-toast]"),
            featured_track: q("[data-featured-track]"),
            quick_view_el: q("[data-quick-view]"),
            quick_view_name: q("[data-quick-view-name]"),
            quick_view_tag: q("[data-quick-view-tag]"),
            quick_view_desc: q("[data-quick-view-description]"),
            quick_view_status: q("[data-quick-view-status]"),
            quick_view_price: q("[data-quick-view-price]"),
            drawer_el: q("[data-mobile-drawer]"),
            drawer_toggle: q("[data-mobile-toggle]"),
            drawer_backdrop: q("[data-mobile-backdrop]"),
            cart: RefCell::new(Cart::new()),
            quick_view: RefCell::new(QuickView::default()),
            drawer: RefCell::new(Drawer::default()),
            modal_lock: RefCell::new(ModalLock::default()),
            toast_timer: Cell::new(None),
            toast_fade_timer: Cell::new(None),
            featured_timer: Cell::new(None),
        });

        store.attach_listeners();
        store.render_products(Filter::All);
        if let Some(first) = store.filter_buttons.first() {
            store.update_filter_state(first);
        }
        store.update_cart_ui();
        store.stamp_year();
        store.start_featured_loop();
        store
    }

    fn attach_listeners(self: &Rc<Self>) {
        // One delegated click handler routes every storefront button.
        {
            let store = self.clone();
            dom::listen_mouse(&self.document, "click", move |ev| {
                store.on_document_click(&ev);
            });
        }
        // Clicks outside an open cart panel close it.
        {
            let store = self.clone();
            dom::listen_mouse(&self.document, "click", move |ev| {
                store.on_outside_click(&ev);
            });
        }
        {
            let store = self.clone();
            dom::listen_keyboard(&self.document, "keydown", move |ev| {
                if ev.key() == "Escape" {
                    store.on_escape();
                }
            });
        }
        // Backdrop click on the quick-view modal.
        if let Some(qv) = &self.quick_view_el {
            let store = self.clone();
            let qv_el = qv.clone();
            dom::listen_mouse(qv, "click", move |ev| {
                let hit_backdrop = ev
                    .target()
                    .and_then(|t| t.dyn_into::<web::Element>().ok())
                    .is_some_and(|t| t == qv_el);
                if hit_backdrop {
                    store.close_quick_view();
                }
            });
        }
        if let Some(track) = &self.featured_track {
            let store = self.clone();
            dom::listen(track, "mouseenter", move || store.stop_featured_loop());
            let store = self.clone();
            dom::listen(track, "mouseleave", move || store.start_featured_loop());
        }
        if let Some(toggle) = &self.drawer_toggle {
            let store = self.clone();
            dom::listen(toggle, "click", move || store.set_drawer(None));
        }
        if let Some(close) = dom::query(&self.document, "[data-mobile-close]") {
            let store = self.clone();
            dom::listen(&close, "click", move || store.set_drawer(Some(false)));
        }
        if let Some(backdrop) = &self.drawer_backdrop {
            let store = self.clone();
            dom::listen(backdrop, "click", move || store.set_drawer(Some(false)));
        }
        for link in dom::query_all(&self.document, "[data-mobile-link]") {
            let store = self.clone();
            dom::listen(&link, "click", move || store.set_drawer(Some(false)));
        }
        self.wire_form(".contact-form", TOAST_CONTACT);
        self.wire_form(".footer-form", TOAST_FOOTER);
    }

    fn wire_form(self: &Rc<Self>, selector: &str, message: &'static str) {
        let Some(form) = dom::query(&self.document, selector) else {
            return;
        };
        let store = self.clone();
        let form_el = form.clone();
        dom::listen_event(&form, "submit", move |ev| {
            ev.prevent_default();
            store.show_toast(message);
            if let Some(form) = form_el.dyn_ref::<web::HtmlFormElement>() {
                form.reset();
            }
        });
    }

    fn on_document_click(self: &Rc<Self>, ev: &web::MouseEvent) {
        let Some(button) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|el| el.closest("button").ok().flatten())
        else {
            return;
        };
        let hits = |sel: &str| button.matches(sel).unwrap_or(false);

        if hits("[data-featured-prev]") {
            self.cycle_featured(false);
            self.start_featured_loop();
        } else if hits("[data-featured-next]") {
            self.cycle_featured(true);
            self.start_featured_loop();
        } else if hits("[data-filter]") {
            self.update_filter_state(&button);
            let filter = Filter::from_key(&button.get_attribute("data-filter").unwrap_or_default());
            self.render_products(filter);
            let label = button.text_content().unwrap_or_else(|| "Products".into());
            self.show_toast(&toast_filter(&label));
        } else if hits("[data-add]") {
            let id = button.get_attribute("product-id").unwrap_or_default();
            self.add_to_cart(&id);
        } else if hits("[data-featured-add]") {
            let id = button
                .closest("[data-product]")
                .ok()
                .flatten()
                .and_then(|card| card.get_attribute("data-product"))
                .unwrap_or_default();
            self.add_to_cart(&id);
        } else if hits("[data-quick-view-trigger]") {
            let id = button
                .get_attribute("data-product")
                .or_else(|| {
                    button
                        .closest("[data-product]")
                        .ok()
                        .flatten()
                        .and_then(|card| card.get_attribute("data-product"))
                })
                .unwrap_or_default();
            self.open_quick_view(&id);
        } else if hits("[data-quick-view-close]") {
            self.close_quick_view();
        } else if hits("[data-quick-view-add]") {
            let current = self.quick_view.borrow().current();
            if let Some(product) = current {
                self.add_to_cart(product.id);
            }
            self.close_quick_view();
        } else if hits("[data-counter-increase]") || hits("[data-counter-decrease]") {
            let Some(counter) = button.closest("[data-counter]").ok().flatten() else {
                return;
            };
            let id = counter.get_attribute("product-id").unwrap_or_default();
            let delta = if hits("[data-counter-increase]") { 1 } else { -1 };
            self.adjust_quantity(&id, delta);
        } else if self.cart_toggle.as_ref() == Some(&button) {
            self.toggle_cart(Some(true));
        } else if self.cart_close.as_ref() == Some(&button) {
            self.toggle_cart(Some(false));
        } else if self.checkout.as_ref() == Some(&button) {
            self.show_toast(TOAST_CHECKOUT);
        }
    }

    fn on_outside_click(&self, ev: &web::MouseEvent) {
        let Some(panel) = &self.cart_panel else {
            return;
        };
        if !dom::has_class(panel, "open") {
            return;
        }
        let target = ev.target().and_then(|t| t.dyn_into::<web::Node>().ok());
        let inside_panel = panel.contains(target.as_ref());
        let on_toggle = self
            .cart_toggle
            .as_ref()
            .is_some_and(|t| t.contains(target.as_ref()));
        if !inside_panel && !on_toggle {
            self.toggle_cart(Some(false));
        }
    }

    fn on_escape(&self) {
        if let Some(panel) = &self.cart_panel {
            if dom::has_class(panel, "open") {
                self.toggle_cart(Some(false));
            }
        }
        if self.quick_view.borrow().is_open() {
            self.close_quick_view();
        }
        if self.drawer.borrow().is_open() {
            self.set_drawer(Some(false));
        }
    }

    // --- catalogue grid ---

    fn render_products(&self, filter: Filter) {
        let Some(grid) = &self.product_grid else {
            return;
        };
        grid.set_inner_html("");
        let fragment = self.document.create_document_fragment();
        for product in filtered_products(filter) {
            if let Some(card) = self.build_product_card(product) {
                let _ = fragment.append_child(&card);
            }
        }
        let _ = grid.append_child(&fragment);
    }

    fn build_product_card(&self, product: &Product) -> Option<web::Element> {
        let card = self.document.create_element("article").ok()?;
        card.set_class_name("product-card");
        let _ = card.set_attribute("data-filter", product.category.key());
        let _ = card.set_attribute("role", "listitem");
        card.set_inner_html(&format!(
            r#"
        <span class="product-tag">{tag}</span>
        <h3 class="product-name">{name}</h3>
        <p>{description}</p>
        <div class="product-cta">
            <span class="product-price">{price}</span>
            <button class="btn primary" type="button" data-add product-id="{id}">Add To Garage</button>
        </div>
        <span class="buy-soon">{status}</span>
    "#,
            tag = product.tag,
            name = product.name,
            description = product.description,
            price = format_usd(product.price),
            id = product.id,
            status = product.status,
        ));
        Some(card)
    }

    fn update_filter_state(&self, active: &web::Element) {
        for button in &self.filter_buttons {
            dom::set_class(button, "active", button == active);
        }
    }

    // --- cart ---

    fn add_to_cart(self: &Rc<Self>, product_id: &str) {
        let added = self.cart.borrow_mut().add(product_id);
        let Some(product) = added else {
            return;
        };
        self.update_cart_ui();
        self.show_toast(&toast_added(product));
    }

    fn adjust_quantity(self: &Rc<Self>, product_id: &str, delta: i32) {
        let outcome = self.cart.borrow_mut().adjust(product_id, delta);
        match outcome {
            Some(AdjustOutcome::Removed) => {
                self.show_toast(TOAST_REMOVED);
                self.update_cart_ui();
            }
            Some(AdjustOutcome::Updated(_)) => self.update_cart_ui(),
            None => {}
        }
    }

    fn update_cart_ui(&self) {
        let cart = self.cart.borrow();
        if let Some(list) = &self.cart_list {
            list.set_inner_html("");
            let fragment = self.document.create_document_fragment();
            for entry in cart.entries() {
                let Ok(li) = self.document.create_element("li") else {
                    continue;
                };
                li.set_class_name("cart-item");
                li.set_inner_html(&format!(
                    r#"
            <div class="cart-quantity" data-counter product-id="{id}">
                <button type="button" data-counter-decrease aria-label="Decrease quantity">−</button>
                <span>{quantity}</span>
                <button type="button" data-counter-increase aria-label="Increase quantity">+</button>
            </div>
            <div>
                <h4>{name}</h4>
                <p class="cart-meta">{tag} · {status}</p>
            </div>
            <strong>{line_total}</strong>
        "#,
                    id = entry.product.id,
                    quantity = entry.quantity,
                    name = entry.product.name,
                    tag = entry.product.tag,
                    status = entry.product.status,
                    line_total = format_usd(entry.product.price * entry.quantity as i64),
                ));
                let _ = fragment.append_child(&li);
            }
            let _ = list.append_child(&fragment);
        }
        dom::set_text(self.cart_count.as_ref(), &cart.item_count().to_string());
        dom::set_text(self.cart_total.as_ref(), &format_usd(cart.total()));
        if let Some(empty) = &self.cart_empty {
            dom::set_hidden(empty, !cart.is_empty());
            let _ = empty.set_attribute("aria-hidden", bool_str(!cart.is_empty()));
        }
        dom::set_text(self.cart_note.as_ref(), &cart.shipping_note());
    }

    fn toggle_cart(&self, force: Option<bool>) {
        let Some(panel) = &self.cart_panel else {
            return;
        };
        let open = force.unwrap_or(!dom::has_class(panel, "open"));
        dom::set_class(panel, "open", open);
        let _ = panel.set_attribute("aria-hidden", bool_str(!open));
        if let Some(toggle) = &self.cart_toggle {
            let _ = toggle.set_attribute("aria-expanded", bool_str(open));
        }
        if let Some(body) = self.document.body() {
            dom::set_class(&body, "cart-open", open);
        }
    }

    // --- toast ---

    fn show_toast(self: &Rc<Self>, message: &str) {
        let Some(toast) = self.toast_el.clone() else {
            return;
        };
        toast.set_text_content(Some(message));
        dom::set_hidden(&toast, false);
        dom::set_class(&toast, "visible", true);
        dom::clear_timeout(self.toast_timer.take());
        dom::clear_timeout(self.toast_fade_timer.take());
        let store = self.clone();
        self.toast_timer.set(dom::set_timeout(TOAST_VISIBLE_MS, move || {
            dom::set_class(&toast, "visible", false);
            let toast = toast.clone();
            store
                .toast_fade_timer
                .set(dom::set_timeout(TOAST_FADE_MS, move || {
                    dom::set_hidden(&toast, true);
                }));
        }));
    }

    // --- featured carousel ---

    fn cycle_featured(&self, forward: bool) {
        let Some(track) = &self.featured_track else {
            return;
        };
        if track.child_element_count() <= 1 {
            return;
        }
        if forward {
            if let Some(first) = track.first_element_child() {
                let _ = track.append_child(&first);
            }
        } else if let Some(last) = track.last_element_child() {
            let _ = track.insert_before(&last, track.first_child().as_ref());
        }
    }

    fn start_featured_loop(self: &Rc<Self>) {
        if self.featured_track.is_none() {
            return;
        }
        dom::clear_interval(self.featured_timer.take());
        let store = self.clone();
        self.featured_timer.set(dom::set_interval(
            CAROUSEL_INTERVAL_MS,
            move || store.cycle_featured(true),
        ));
    }

    fn stop_featured_loop(&self) {
        dom::clear_interval(self.featured_timer.take());
    }

    // --- quick view ---

    fn open_quick_view(&self, product_id: &str) {
        let Some(qv) = &self.quick_view_el else {
            return;
        };
        let opened = self.quick_view.borrow_mut().open(product_id);
        let Some(product) = opened else {
            return;
        };
        let _ = qv.set_attribute("data-product-id", product.id);
        dom::set_text(self.quick_view_name.as_ref(), product.name);
        dom::set_text(self.quick_view_tag.as_ref(), product.tag);
        dom::set_text(self.quick_view_desc.as_ref(), product.description);
        dom::set_text(self.quick_view_status.as_ref(), product.status);
        dom::set_text(self.quick_view_price.as_ref(), &format_usd(product.price));
        dom::set_class(qv, "open", true);
        let _ = qv.set_attribute("aria-hidden", "false");
        self.lock_acquire();
    }

    fn close_quick_view(&self) {
        let Some(qv) = &self.quick_view_el else {
            return;
        };
        if self.quick_view.borrow_mut().close() {
            dom::set_class(qv, "open", false);
            let _ = qv.set_attribute("aria-hidden", "true");
            self.lock_release();
        }
        let _ = qv.remove_attribute("data-product-id");
    }

    // --- mobile drawer ---

    fn set_drawer(&self, force: Option<bool>) {
        let Some(drawer_el) = &self.drawer_el else {
            return;
        };
        let Some(open) = self.drawer.borrow_mut().set(force) else {
            return;
        };
        dom::set_class(drawer_el, "open", open);
        let _ = drawer_el.set_attribute("aria-hidden", bool_str(!open));
        if let Some(toggle) = &self.drawer_toggle {
            let _ = toggle.set_attribute("aria-expanded", bool_str(open));
        }
        if let Some(backdrop) = &self.drawer_backdrop {
            dom::set_class(backdrop, "visible", open);
        }
        if open {
            self.lock_acquire();
        } else {
            self.lock_release();
        }
    }

    // --- modal scroll lock ---

    fn lock_acquire(&self) {
        if self.modal_lock.borrow_mut().acquire() {
            if let Some(body) = self.document.body() {
                dom::set_class(&body, "modal-open", true);
            }
        }
    }

    fn lock_release(&self) {
        if self.modal_lock.borrow_mut().release() {
            if let Some(body) = self.document.body() {
                dom::set_class(&body, "modal-open", false);
            }
        }
    }

    fn stamp_year(&self) {
        let year = js_sys::Date::new_0().get_full_year().to_string();
        for el in dom::query_all(&self.document, "[data-year]") {
            el.set_text_content(Some(&year));
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
