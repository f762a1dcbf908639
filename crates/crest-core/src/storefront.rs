//! Client-side storefront state: cart bookkeeping, carousel rotation, modal
//! scroll locking, the quick-view modal and the mobile drawer. Pure state
//! machines; the web layer mirrors them into the DOM.

use crate::catalog::{find_product, format_usd, Product};
use crate::constants::FREE_SHIPPING_THRESHOLD;

#[derive(Clone, Debug)]
pub struct CartEntry {
    pub product: &'static Product,
    pub quantity: u32,
}

/// Insertion-ordered cart over the catalogue. Quantities only; nothing is
/// persisted and there is no real checkout.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjustOutcome {
    Updated(u32),
    Removed,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of the product. Unknown ids no-op and return `None`.
    pub fn add(&mut self, product_id: &str) -> Option<&'static Product> {
        let product = find_product(product_id)?;
        match self.entries.iter_mut().find(|e| e.product.id == product.id) {
            Some(entry) => entry.quantity += 1,
            None => self.entries.push(CartEntry {
                product,
                quantity: 1,
            }),
        }
        Some(product)
    }

    /// Adjust an entry's quantity by +-1 (or any delta). Dropping to zero or
    /// below removes the entry.
    pub fn adjust(&mut self, product_id: &str, delta: i32) -> Option<AdjustOutcome> {
        let index = self
            .entries
            .iter()
            .position(|e| e.product.id == product_id)?;
        let entry = &mut self.entries[index];
        let next = entry.quantity as i64 + delta as i64;
        if next <= 0 {
            self.entries.remove(index);
            Some(AdjustOutcome::Removed)
        } else {
            entry.quantity = next as u32;
            Some(AdjustOutcome::Updated(next as u32))
        }
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn item_count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn total(&self) -> i64 {
        self.entries
            .iter()
            .map(|e| e.product.price * e.quantity as i64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The note under the cart total: progress toward, or confirmation of,
    /// complimentary shipping.
    pub fn shipping_note(&self) -> String {
        let total = self.total();
        if total >= FREE_SHIPPING_THRESHOLD {
            "Complimentary global express shipping unlocked.".to_string()
        } else {
            format!(
                "Spend {} more for complimentary shipping.",
                format_usd(FREE_SHIPPING_THRESHOLD - total)
            )
        }
    }
}

/// Rotate the carousel track forward: first item moves to the back. Tracks
/// with fewer than two items do not rotate.
pub fn rotate_forward<T>(track: &mut Vec<T>) {
    if track.len() > 1 {
        let first = track.remove(0);
        track.push(first);
    }
}

/// Rotate backward: last item moves to the front.
pub fn rotate_backward<T>(track: &mut Vec<T>) {
    if track.len() > 1 {
        if let Some(last) = track.pop() {
            track.insert(0, last);
        }
    }
}

/// Counted scroll lock shared by the quick-view modal and the mobile drawer.
/// The body class is held while any holder remains; release never underflows.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModalLock {
    count: u32,
}

impl ModalLock {
    /// Returns true when this acquire locked the page (count 0 -> 1).
    pub fn acquire(&mut self) -> bool {
        self.count += 1;
        self.count == 1
    }

    /// Returns true when this release unlocked the page (count 1 -> 0).
    pub fn release(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }

    pub fn is_locked(&self) -> bool {
        self.count > 0
    }
}

/// Quick-view modal selection. Opening an unknown product id no-ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuickView {
    product: Option<&'static Product>,
}

impl QuickView {
    pub fn open(&mut self, product_id: &str) -> Option<&'static Product> {
        let product = find_product(product_id)?;
        self.product = Some(product);
        Some(product)
    }

    /// Returns true if the modal was open.
    pub fn close(&mut self) -> bool {
        self.product.take().is_some()
    }

    pub fn current(&self) -> Option<&'static Product> {
        self.product
    }

    pub fn is_open(&self) -> bool {
        self.product.is_some()
    }
}

/// Mobile navigation drawer. `set(None)` toggles; returns the new state only
/// when it actually changed, so DOM/aria updates run once per transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct Drawer {
    open: bool,
}

impl Drawer {
    pub fn set(&mut self, force: Option<bool>) -> Option<bool> {
        let next = force.unwrap_or(!self.open);
        if next == self.open {
            return None;
        }
        self.open = next;
        Some(next)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

// Toast copy, matching the page's voice.

pub fn toast_added(product: &Product) -> String {
    format!("{} ready in the garage.", product.name)
}

pub fn toast_filter(label: &str) -> String {
    format!("{} loaded.", label.trim())
}

pub const TOAST_REMOVED: &str = "Item removed from the garage.";
pub const TOAST_CHECKOUT: &str = "Simulation checkout complete.";
pub const TOAST_CONTACT: &str = "Message dispatched to strategy team.";
pub const TOAST_FOOTER: &str = "Added to paddock mailing list.";
