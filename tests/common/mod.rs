#![allow(dead_code)]

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A `storefront` command rooted at `data_dir`.
pub fn storefront(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("storefront"));
    cmd.arg("--data-dir").arg(data_dir).env_remove("RUST_LOG");
    cmd
}

pub fn register(data_dir: &Path, id: &str, card: &str) {
    storefront(data_dir)
        .args([
            "register",
            "--id",
            id,
            "--password",
            "Secret#1",
            "--name",
            "Alice Smith",
            "--address",
            "1 Main St",
            "--card",
            card,
            "--question",
            "First pet?",
            "--answer",
            "Rex",
        ])
        .assert()
        .success();
}

pub fn write_cart(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("cart.csv");
    let mut contents = String::from("item,quantity\n");
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// `storefront checkout` for a customer registered through [`register`].
pub fn checkout(data_dir: &Path, id: &str, cart: &Path) -> Command {
    let mut cmd = storefront(data_dir);
    cmd.args(["checkout", "--customer", id, "--password", "Secret#1", "--answer", "rex"])
        .arg("--cart")
        .arg(cart);
    cmd
}
