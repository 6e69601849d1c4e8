//! User creation and favorites list behavior.

use axum::http::{Method, StatusCode};
use serde_json::json;

use kicks_integration_tests::{authed, authed_json, send, test_app, tokens};

fn product_doc(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "primaryName": name,
        "msrp": "170.00",
    })
}

#[tokio::test]
async fn add_user_creates_an_empty_favorites_document() {
    let (app, store, _storage) = test_app();
    let token = tokens::mint("auth0|5e9f8a7b", &[]);

    let (status, body) = send(app, authed(Method::POST, "/add-user", &token)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    // Document key is the subject without the provider prefix
    assert_eq!(
        store.document("users", "5e9f8a7b"),
        Some(json!({"products": []}))
    );
}

#[tokio::test]
async fn add_product_appends_to_the_list() {
    let (app, store, _storage) = test_app();
    store.insert("users", "shopper", json!({"products": []}));
    let token = tokens::mint("auth0|shopper", &[]);

    let (status, body) = send(
        app,
        authed_json(
            Method::POST,
            "/favorites/add-product",
            &token,
            &json!({"id": "a1b2c3d4"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(
        store.document("users", "shopper"),
        Some(json!({"products": ["a1b2c3d4"]}))
    );
}

#[tokio::test]
async fn add_product_twice_is_a_no_op() {
    let (app, store, _storage) = test_app();
    store.insert("users", "shopper", json!({"products": ["a1b2c3d4"]}));
    let token = tokens::mint("auth0|shopper", &[]);

    let (status, body) = send(
        app,
        authed_json(
            Method::POST,
            "/favorites/add-product",
            &token,
            &json!({"id": "a1b2c3d4"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        store.document("users", "shopper"),
        Some(json!({"products": ["a1b2c3d4"]}))
    );
}

#[tokio::test]
async fn add_product_without_a_user_document_is_not_found() {
    let (app, _store, _storage) = test_app();
    let token = tokens::mint("auth0|stranger", &[]);

    let (status, body) = send(
        app,
        authed_json(
            Method::POST,
            "/favorites/add-product",
            &token,
            &json!({"id": "a1b2c3d4"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn remove_product_updates_the_list() {
    let (app, store, _storage) = test_app();
    store.insert(
        "users",
        "shopper",
        json!({"products": ["a1b2c3d4", "e5f6a7b8"]}),
    );
    let token = tokens::mint("auth0|shopper", &[]);

    let (status, _body) = send(
        app,
        authed_json(
            Method::DELETE,
            "/favorites/remove-product",
            &token,
            &json!({"id": "a1b2c3d4"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        store.document("users", "shopper"),
        Some(json!({"products": ["e5f6a7b8"]}))
    );
}

#[tokio::test]
async fn remove_absent_product_is_a_no_op() {
    let (app, store, _storage) = test_app();
    store.insert("users", "shopper", json!({"products": ["a1b2c3d4"]}));
    let token = tokens::mint("auth0|shopper", &[]);

    let (status, body) = send(
        app,
        authed_json(
            Method::DELETE,
            "/favorites/remove-product",
            &token,
            &json!({"id": "zzzzzzzz"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        store.document("users", "shopper"),
        Some(json!({"products": ["a1b2c3d4"]}))
    );
}

#[tokio::test]
async fn favorites_list_resolves_full_products_in_order() {
    let (app, store, _storage) = test_app();
    store.insert("products", "a1b2c3d4", product_doc("a1b2c3d4", "Air Jordan 1"));
    store.insert("products", "e5f6a7b8", product_doc("e5f6a7b8", "Dunk Low"));
    store.insert(
        "users",
        "shopper",
        json!({"products": ["e5f6a7b8", "a1b2c3d4"]}),
    );
    let token = tokens::mint("auth0|shopper", &[]);

    let (status, body) = send(app, authed(Method::GET, "/favorites", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["products"][0]["primaryName"], "Dunk Low");
    assert_eq!(body["products"][1]["primaryName"], "Air Jordan 1");
}

#[tokio::test]
async fn favorites_list_with_a_vanished_product_is_not_found() {
    let (app, store, _storage) = test_app();
    store.insert("users", "shopper", json!({"products": ["gone1234"]}));
    let token = tokens::mint("auth0|shopper", &[]);

    let (status, body) = send(app, authed(Method::GET, "/favorites", &token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
