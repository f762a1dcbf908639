// Host-side tests for the storefront simulation: catalogue filtering, cart
// arithmetic, carousel rotation and the modal/drawer state machines.

use crest_core::catalog::{
    filtered_products, find_product, format_usd, product_index, Category, Filter, PRODUCTS,
};
use crest_core::storefront::{
    rotate_backward, rotate_forward, toast_added, toast_filter, AdjustOutcome, Cart, Drawer,
    ModalLock, QuickView, TOAST_REMOVED,
};

#[test]
fn catalogue_has_unique_ids_and_positive_prices() {
    let index = product_index();
    assert_eq!(index.len(), PRODUCTS.len(), "duplicate product id");
    for product in PRODUCTS {
        assert!(product.price > 0);
        assert!(!product.name.is_empty());
    }
}

#[test]
fn filter_admits_by_category() {
    let all = filtered_products(Filter::All);
    assert_eq!(all.len(), PRODUCTS.len());

    let tech = filtered_products(Filter::Only(Category::Technology));
    assert!(!tech.is_empty() && tech.len() < all.len());
    assert!(tech.iter().all(|p| p.category == Category::Technology));
}

#[test]
fn unknown_filter_keys_fall_back_to_all() {
    assert_eq!(Filter::from_key("all"), Filter::All);
    assert_eq!(Filter::from_key("apparel"), Filter::Only(Category::Apparel));
    assert_eq!(Filter::from_key("warp-drives"), Filter::All);
    assert_eq!(Filter::from_key(""), Filter::All);
}

#[test]
fn usd_formatting_groups_thousands() {
    assert_eq!(format_usd(0), "$0");
    assert_eq!(format_usd(440), "$440");
    assert_eq!(format_usd(1_250), "$1,250");
    assert_eq!(format_usd(1_234_567), "$1,234,567");
    assert_eq!(format_usd(-430), "-$430");
}

#[test]
fn cart_merges_repeat_adds() {
    let mut cart = Cart::new();
    assert!(cart.is_empty());
    assert!(cart.add("grid-helmet").is_some());
    assert!(cart.add("grid-helmet").is_some());
    assert!(cart.add("apex-jacket").is_some());

    assert_eq!(cart.entries().len(), 2, "repeat adds merge into one entry");
    assert_eq!(cart.item_count(), 3);

    let helmet = find_product("grid-helmet").unwrap();
    let jacket = find_product("apex-jacket").unwrap();
    assert_eq!(cart.total(), helmet.price * 2 + jacket.price);
}

#[test]
fn cart_rejects_unknown_ids() {
    let mut cart = Cart::new();
    assert!(cart.add("flux-capacitor").is_none());
    assert!(cart.is_empty());
    assert!(cart.adjust("flux-capacitor", 1).is_none());
}

#[test]
fn adjusting_to_zero_removes_the_entry() {
    let mut cart = Cart::new();
    cart.add("hud-rig");
    cart.add("hud-rig");

    assert_eq!(cart.adjust("hud-rig", -1), Some(AdjustOutcome::Updated(1)));
    assert_eq!(cart.adjust("hud-rig", -1), Some(AdjustOutcome::Removed));
    assert!(cart.is_empty());
    assert_eq!(cart.adjust("hud-rig", -1), None, "entry is gone");
}

#[test]
fn shipping_note_crosses_the_threshold() {
    let mut cart = Cart::new();
    cart.add("apex-jacket"); // 320
    assert_eq!(
        cart.shipping_note(),
        "Spend $430 more for complimentary shipping."
    );

    cart.add("pitwall-tablet"); // 780, total now 1100
    assert_eq!(
        cart.shipping_note(),
        "Complimentary global express shipping unlocked."
    );
}

#[test]
fn carousel_rotation_moves_one_slot() {
    let mut track = vec!["a", "b", "c"];
    rotate_forward(&mut track);
    assert_eq!(track, vec!["b", "c", "a"]);
    rotate_backward(&mut track);
    assert_eq!(track, vec!["a", "b", "c"]);
}

#[test]
fn short_tracks_do_not_rotate() {
    let mut one = vec![42];
    rotate_forward(&mut one);
    rotate_backward(&mut one);
    assert_eq!(one, vec![42]);

    let mut none: Vec<i32> = Vec::new();
    rotate_forward(&mut none);
    assert!(none.is_empty());
}

#[test]
fn modal_lock_is_counted() {
    let mut lock = ModalLock::default();
    assert!(lock.acquire(), "first holder locks the page");
    assert!(!lock.acquire(), "second holder observes it already locked");
    assert!(!lock.release(), "page stays locked while one holder remains");
    assert!(lock.release(), "last holder unlocks");
    assert!(!lock.is_locked());
    assert!(!lock.release(), "release never underflows");
    assert!(lock.acquire(), "lock still works after an over-release");
}

#[test]
fn quick_view_ignores_unknown_products() {
    let mut qv = QuickView::default();
    assert!(qv.open("not-a-product").is_none());
    assert!(!qv.is_open());

    let product = qv.open("concept-car").expect("known product opens");
    assert_eq!(product.id, "concept-car");
    assert!(qv.is_open());
    assert!(qv.close());
    assert!(!qv.close(), "closing twice is a no-op");
    assert!(qv.current().is_none());
}

#[test]
fn drawer_reports_only_real_transitions() {
    let mut drawer = Drawer::default();
    assert_eq!(drawer.set(None), Some(true), "toggle from closed opens");
    assert_eq!(drawer.set(Some(true)), None, "forcing the current state is silent");
    assert_eq!(drawer.set(None), Some(false));
    assert_eq!(drawer.set(Some(false)), None);
}

#[test]
fn toast_copy_matches_the_page_voice() {
    let helmet = find_product("grid-helmet").unwrap();
    assert_eq!(
        toast_added(helmet),
        format!("{} ready in the garage.", helmet.name)
    );
    assert_eq!(toast_filter("  Apparel \n"), "Apparel loaded.");
    assert_eq!(TOAST_REMOVED, "Item removed from the garage.");
}
