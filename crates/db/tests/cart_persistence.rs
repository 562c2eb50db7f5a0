use foodshop_core::{CartManager, CartStorage, Catalog, ProductId};
use foodshop_db::SqliteStorage;
use tempfile::TempDir;

fn open(dir: &TempDir) -> SqliteStorage {
    let url = format!("sqlite://{}", dir.path().join("foodshop.db").display());
    SqliteStorage::open(&url, 1, 30).expect("open sqlite storage")
}

#[test]
fn cart_survives_reopening_the_database() {
    let dir = TempDir::new().expect("temp dir");

    let mut first = CartManager::load(Catalog::builtin(), open(&dir));
    first.add(ProductId(1)).expect("add rice");
    first.add(ProductId(1)).expect("add rice again");
    first.add(ProductId(3)).expect("add plantain");
    assert!(first.is_synced());
    let expected = first.lines().to_vec();
    drop(first);

    let second = CartManager::load(Catalog::builtin(), open(&dir));
    assert_eq!(second.lines(), expected.as_slice());
    assert_eq!(second.total_price(), 19200);
    assert_eq!(second.total_quantity(), 3);
}

#[test]
fn stale_rows_are_repaired_on_load() {
    let dir = TempDir::new().expect("temp dir");

    let mut storage = open(&dir);
    storage
        .write(
            "cart",
            r#"[{"id":404,"qty":1},{"name":"Gari (5kg)","quantity":"2"},{"id":6,"qty":0}]"#,
        )
        .expect("seed stale cart");
    storage.close();

    let manager = CartManager::load(Catalog::builtin(), open(&dir));
    let summary: Vec<(u32, u32)> =
        manager.lines().iter().map(|line| (line.product_id.0, line.quantity)).collect();
    assert_eq!(summary, vec![(5, 2), (6, 1)]);

    let stored = manager.storage().read("cart").expect("read").expect("persisted");
    assert!(!stored.contains("404"));
    assert!(stored.contains(r#""qty":2"#));
}
