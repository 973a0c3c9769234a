mod common;

use assert_cmd::prelude::*;
use common::{checkout, register, storefront, write_cart};
use predicates::prelude::*;

#[test]
fn test_catalog_listing() {
    let dir = tempfile::tempdir().unwrap();

    storefront(dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "id,name,description,regular_price,sale_price,price",
        ))
        .stdout(predicate::str::contains(
            "M003,Wireless Mouse,Ergonomic wireless mouse,35.00,25.00,25.00",
        ))
        .stdout(predicate::str::contains("M004,USB-C Hub,Multi-port adapter,50.00,,50.00"));
}

#[test]
fn test_register_rejects_duplicate_id() {
    let dir = tempfile::tempdir().unwrap();
    register(dir.path(), "alice", "4111111111111111");
    assert!(dir.path().join("customers.json").exists());

    storefront(dir.path())
        .args([
            "register", "--id", "alice", "--password", "x", "--name", "Other", "--address",
            "2 Side St", "--card", "5500", "--question", "q", "--answer", "a",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Customer ID already exists: alice"));
}

#[test]
fn test_checkout_mail_delivery_then_list_orders() {
    let dir = tempfile::tempdir().unwrap();
    register(dir.path(), "alice", "4111111111111111");
    let cart = write_cart(dir.path(), &["M003,2", "m004,1"]);

    checkout(dir.path(), "alice", &cart)
        .args(["--delivery", "mail", "--decline-rate", "0", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ",alice,M003x2;M004x1,Mail Delivery,3.00,111.00,",
        ))
        .stdout(predicate::str::contains("ORD-"))
        .stdout(predicate::str::contains("Pending").not());

    storefront(dir.path())
        .args(["orders", "--customer", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M003x2;M004x1,Mail Delivery,3.00,111.00"));

    let orders = std::fs::read_to_string(dir.path().join("orders.json")).unwrap();
    let start = orders.find("ORD-").unwrap();
    let order_id = &orders[start..start + 12];

    storefront(dir.path())
        .args(["orders", "--customer", "alice", "--order", order_id])
        .assert()
        .success()
        .stdout(predicate::str::contains(order_id));

    storefront(dir.path())
        .args(["orders", "--customer", "bob", "--order", order_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No order"));

    storefront(dir.path())
        .args(["orders", "--customer", "alice", "--order", "ord-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid order ID: ord-1"));

    storefront(dir.path())
        .args(["orders", "--customer", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_pickup_skips_bad_cart_lines() {
    let dir = tempfile::tempdir().unwrap();
    register(dir.path(), "alice", "4111111111111111");
    let cart = write_cart(dir.path(), &["M999,1", "M002,0", "M002,1"]);

    checkout(dir.path(), "alice", &cart)
        .args(["--delivery", "pickup", "--decline-rate", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping cart line"))
        .stdout(predicate::str::contains(
            ",alice,M002x1,In-store Pickup,0.00,86.40,",
        ));
}

#[test]
fn test_wrong_credentials() {
    let dir = tempfile::tempdir().unwrap();
    register(dir.path(), "alice", "4111111111111111");
    let cart = write_cart(dir.path(), &["M002,1"]);

    storefront(dir.path())
        .args(["checkout", "--customer", "alice", "--password", "nope", "--answer", "Rex"])
        .arg("--cart")
        .arg(&cart)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed for customer alice"));

    checkout(dir.path(), "carol", &cart)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No account found with ID carol"));
}
