use std::fs;

use foodshop_core::{CartManager, Catalog, FileStorage, PriceFormat, Product, ProductId};
use tempfile::TempDir;

#[test]
fn cart_survives_a_reload_from_file_storage() {
    let dir = TempDir::new().expect("temp dir");

    let mut session = CartManager::load(Catalog::builtin(), FileStorage::new(dir.path()));
    session.add(ProductId(2)).expect("add yam");
    session.add(ProductId(4)).expect("add beans");
    session.set_quantity_delta(ProductId(4), 2).expect("more beans");
    drop(session);

    let reloaded = CartManager::load(Catalog::builtin(), FileStorage::new(dir.path()));
    assert_eq!(reloaded.total_quantity(), 4);
    assert_eq!(reloaded.total_price(), 6800 + 7200 * 3);

    let summary = reloaded.checkout_summary().expect("checkout allowed");
    assert_eq!(
        summary.message(&PriceFormat::default()),
        "Order: Poundo Yam (2kg) x1, Honey Beans (3kg) x3\nTotal: ₦28,400"
    );
}

#[test]
fn reload_against_a_smaller_catalog_drops_retired_products() {
    let dir = TempDir::new().expect("temp dir");

    let mut session = CartManager::load(Catalog::builtin(), FileStorage::new(dir.path()));
    session.add(ProductId(1)).expect("add rice");
    session.add(ProductId(6)).expect("add palm oil");
    drop(session);

    let slimmer = Catalog::new(vec![Product::new(6, "Palm Oil (5L)", 12000, "", "oil.jpg", 4.7)])
        .expect("valid catalog");
    let reloaded = CartManager::load(slimmer, FileStorage::new(dir.path()));

    assert_eq!(reloaded.lines().len(), 1);
    let line = &reloaded.lines()[0];
    assert_eq!(line.product_id, ProductId(6));
    assert_eq!(line.price, 12000);
    assert_eq!(line.image, "Assets/Items/palm oil.jpg");

    let stored = fs::read_to_string(dir.path().join("cart.json")).expect("stored cart");
    assert!(!stored.contains("Ofada"));
}

#[test]
fn legacy_storage_format_is_upgraded_on_load() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("cart.json"),
        r#"[{"id":3,"name":"Ripe Plantain (Bunch)","price":2200,"desc":"Organic ripe plantain","rating":4.7,"quantity":2}]"#,
    )
    .expect("seed legacy cart");

    let session = CartManager::load(Catalog::builtin(), FileStorage::new(dir.path()));
    assert_eq!(session.total_quantity(), 2);

    let stored = fs::read_to_string(dir.path().join("cart.json")).expect("stored cart");
    assert_eq!(
        stored,
        r#"[{"id":3,"name":"Ripe Plantain (Bunch)","price":2200,"img":"Assets/Items/Ripe plantain.JPG","qty":2}]"#
    );
}
