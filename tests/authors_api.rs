mod common;

use axum::http::{Method, StatusCode};
use libris_http::INTERNAL_ERROR_MESSAGE;
use serde_json::json;

use common::{author, in_memory_app, send};

#[tokio::test]
async fn empty_store_lists_nothing() {
    let app = in_memory_app(vec![]);

    let reply = send(&app.router, Method::GET, "/api/authors", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!([]));
}

#[tokio::test]
async fn lists_authors_in_id_order() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin"), author("Iain", "Banks")]);

    let reply = send(&app.router, Method::GET, "/api/authors", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let authors = reply.body.as_array().unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0]["id"], 1);
    assert_eq!(authors[0]["lastname"], "Le Guin");
    assert_eq!(authors[1]["firstname"], "Iain");
    assert_eq!(authors[1]["books"], json!([]));
}

#[tokio::test]
async fn get_returns_the_author() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(&app.router, Method::GET, "/api/authors/1", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["firstname"], "Ursula");
    assert_eq!(reply.body["bio"], json!(null));
}

#[tokio::test]
async fn missing_author_is_not_found() {
    let app = in_memory_app(vec![]);

    let reply = send(&app.router, Method::GET, "/api/authors/42", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"]["code"], "not_found");
}

#[tokio::test]
async fn create_assigns_a_fresh_id() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(
        &app.router,
        Method::POST,
        "/api/authors",
        Some(json!({ "id": 1, "firstname": "Octavia", "lastname": "Butler", "bio": "Kindred" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["data"]["id"], 2);
    assert_eq!(reply.body["data"]["firstname"], "Octavia");
    assert_eq!(reply.headers["location"], "/api/authors/2");

    let stored = app.authors.rows();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].firstname, "Ursula");
    assert_eq!(stored[1].bio.as_deref(), Some("Kindred"));
}

#[tokio::test]
async fn create_with_empty_firstname_never_reaches_storage() {
    let app = in_memory_app(vec![]);

    let reply = send(
        &app.router,
        Method::POST,
        "/api/authors",
        Some(json!({ "firstname": "", "lastname": "Butler" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "validation_error");
    assert_eq!(reply.body["error"]["details"][0]["field"], "firstname");
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn create_without_body_is_rejected() {
    let app = in_memory_app(vec![]);

    let reply = send(&app.router, Method::POST, "/api/authors", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "bad_request");
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = in_memory_app(vec![]);

    let reply = send(
        &app.router,
        Method::POST,
        "/api/authors",
        Some(json!({ "firstname": 7 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn rejected_commit_is_a_generic_500() {
    let app = in_memory_app(vec![]);
    app.authors.reject_commits(true);

    let reply = send(
        &app.router,
        Method::POST,
        "/api/authors",
        Some(json!({ "firstname": "Octavia", "lastname": "Butler" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["error"]["message"], INTERNAL_ERROR_MESSAGE);
    assert!(app.authors.rows().is_empty());
}

#[tokio::test]
async fn storage_fault_is_a_generic_500() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);
    app.authors.set_offline(true);

    let reply = send(&app.router, Method::GET, "/api/authors", None).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["error"]["code"], "internal_error");
    assert_eq!(reply.body["error"]["message"], INTERNAL_ERROR_MESSAGE);
    assert!(!reply.body.to_string().contains("offline"));
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/1",
        Some(json!({ "id": 1, "firstname": "Ursula K.", "lastname": "Le Guin", "bio": "Earthsea" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    let stored = app.authors.rows();
    assert_eq!(stored[0].firstname, "Ursula K.");
    assert_eq!(stored[0].bio.as_deref(), Some("Earthsea"));
}

#[tokio::test]
async fn update_with_mismatched_id_never_reaches_storage() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/1",
        Some(json!({ "id": 2, "firstname": "Ursula", "lastname": "Le Guin" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["details"][0]["error"], "mismatch");
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn update_without_body_id_is_rejected() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/1",
        Some(json!({ "firstname": "Ursula", "lastname": "Le Guin" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn update_with_non_positive_id_is_rejected() {
    let app = in_memory_app(vec![]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/0",
        Some(json!({ "id": 0, "firstname": "Ursula", "lastname": "Le Guin" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn update_of_unknown_author_is_a_generic_500() {
    let app = in_memory_app(vec![]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/9",
        Some(json!({ "id": 9, "firstname": "Ursula", "lastname": "Le Guin" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["error"]["message"], INTERNAL_ERROR_MESSAGE);
}

#[tokio::test]
async fn delete_removes_the_author() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin"), author("Iain", "Banks")]);

    let reply = send(&app.router, Method::DELETE, "/api/authors/1", None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let stored = app.authors.rows();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].lastname, "Banks");

    let again = send(&app.router, Method::DELETE, "/api/authors/1", None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = in_memory_app(vec![]);

    let reply = send(&app.router, Method::GET, "/api/authors/abc", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["code"], "bad_request");
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn delete_with_non_positive_id_never_reaches_storage() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(&app.router, Method::DELETE, "/api/authors/0", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["details"][0]["field"], "id");
    assert_eq!(app.authors.operation_count(), 0);
}

#[tokio::test]
async fn rejected_delete_is_a_generic_500() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);
    app.authors.reject_commits(true);

    let reply = send(&app.router, Method::DELETE, "/api/authors/1", None).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["error"]["message"], INTERNAL_ERROR_MESSAGE);
    assert_eq!(app.authors.rows().len(), 1);
}

#[tokio::test]
async fn update_with_blank_firstname_never_reaches_storage() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/1",
        Some(json!({ "id": 1, "firstname": "", "lastname": "Le Guin" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["details"][0]["field"], "firstname");
    assert_eq!(app.authors.operation_count(), 0);
    assert_eq!(app.authors.rows()[0].firstname, "Ursula");
}

#[tokio::test]
async fn update_reports_every_problem_at_once() {
    let app = in_memory_app(vec![author("Ursula", "Le Guin")]);

    let reply = send(
        &app.router,
        Method::PUT,
        "/api/authors/1",
        Some(json!({ "id": 2, "firstname": "", "lastname": "Le Guin" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let details = reply.body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["field"], "firstname");
    assert_eq!(details[1]["field"], "id");
    assert_eq!(details[1]["error"], "mismatch");
    assert_eq!(app.authors.operation_count(), 0);
}
