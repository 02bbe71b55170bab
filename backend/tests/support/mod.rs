#![allow(dead_code, unused_macros)]

use serde_json::{json, Value};
use tempfile::TempDir;
use tracker_backend::db::Store;

pub fn temp_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Store::init(dir.path().join("tracker.sqlite")).expect("init store");
    (dir, store)
}

/// Builds the full application around `store`.
macro_rules! init_app {
    ($store:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(tracker_backend::configure_app($store, 1 << 20))
                .default_service(actix_web::web::route().to(tracker_backend::not_found)),
        )
        .await
    };
}

/// Sends a `TestRequest` and returns `(status, json body)`.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

pub fn batch_body(code: &str, dates: &[&str]) -> Value {
    json!({
        "batchId": code,
        "description": format!("Demo batch {}", code),
        "demoDates": dates,
    })
}

pub fn enroll_body(code: &str, name: &str, mobile: &str, email: &str) -> Value {
    json!({
        "batchId": code,
        "name": name,
        "mobileNumber": mobile,
        "email": email,
        "isWalkIn": false,
    })
}
