#[macro_use]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::json;
use support::{batch_body, enroll_body, temp_store};

#[actix_web::test]
async fn batch_dates_round_trip_in_order() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    let (status, created) = send!(
        app,
        TestRequest::post()
            .uri("/api/batches")
            .set_json(batch_body("B1", &["2024-05-01", "2024-05-02", "2024-05-03"]))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, by_id) = send!(app, TestRequest::get().uri(&format!("/api/batches/{}", id)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        by_id["data"]["demoDates"],
        json!(["2024-05-01", "2024-05-02", "2024-05-03"])
    );

    let (status, by_code) = send!(app, TestRequest::get().uri("/api/batches/code/B1"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_code["data"]["id"], json!(id));
}

#[actix_web::test]
async fn duplicate_code_is_a_bad_request() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    let (status, _) = send!(
        app,
        TestRequest::post().uri("/api/batches").set_json(batch_body("B1", &[]))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/batches").set_json(batch_body("B1", &[]))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "A batch with this ID already exists");
}

#[actix_web::test]
async fn list_is_newest_first_with_count() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    for code in ["B1", "B2", "B3"] {
        send!(
            app,
            TestRequest::post().uri("/api/batches").set_json(batch_body(code, &[]))
        );
    }

    let (status, body) = send!(app, TestRequest::get().uri("/api/batches"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["batchId"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["B3", "B2", "B1"]);
}

#[actix_web::test]
async fn update_keeps_the_code_and_replaces_dates() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    let (_, created) = send!(
        app,
        TestRequest::post()
            .uri("/api/batches")
            .set_json(batch_body("B1", &["2024-05-01"]))
    );
    let uri = format!("/api/batches/{}", created["data"]["id"].as_str().unwrap());

    let (status, updated) = send!(
        app,
        TestRequest::put().uri(&uri).set_json(json!({
            "description": "Weekend batch",
            "demoDates": ["2024-06-08", "2024-06-09"],
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["description"], "Weekend batch");
    assert_eq!(updated["data"]["demoDates"], json!(["2024-06-08", "2024-06-09"]));
    assert_eq!(updated["data"]["batchId"], "B1");

    let (status, _) = send!(
        app,
        TestRequest::put().uri(&uri).set_json(json!({ "batchId": "B9" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_removes_batch_and_its_enrollments() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    let (_, created) = send!(
        app,
        TestRequest::post()
            .uri("/api/batches")
            .set_json(batch_body("B1", &["2024-05-01"]))
    );
    let (_, enrolled) = send!(
        app,
        TestRequest::post()
            .uri("/api/enrollments")
            .set_json(enroll_body("B1", "Kavya", "9000000011", "kavya@example.com"))
    );
    let enrollment_uri = format!(
        "/api/enrollments/{}",
        enrolled["data"]["id"].as_str().unwrap()
    );
    let uri = format!("/api/batches/{}", created["data"]["id"].as_str().unwrap());

    let (status, deleted) = send!(app, TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Batch deleted successfully");
    assert_eq!(deleted["data"]["batchId"], "B1");

    let (status, _) = send!(app, TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send!(app, TestRequest::get().uri(&enrollment_uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send!(app, TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_body_is_a_validation_error() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    let (status, body) = send!(
        app,
        TestRequest::post().uri("/api/batches").set_json(json!({
            "batchId": "B1",
            "description": "x",
            "demoDates": ["not a date"],
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn unknown_route_uses_the_envelope() {
    let (_dir, store) = temp_store();
    let app = init_app!(store);

    let (status, body) = send!(app, TestRequest::get().uri("/api/nothing-here"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
