//! End-to-end tests driving the full router over an in-memory database.
//!
//! Each test builds its own state: in-memory `SQLite`, migrations, and a
//! small seeded catalog. Requests go through `tower::ServiceExt::oneshot`,
//! so routing, extractors, guards, and serialization are all exercised.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use std::str::FromStr;

use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use plantsco_api::config::Config;
use plantsco_api::db::{self, ProductRepository, PromoCodeRepository};
use plantsco_api::routes;
use plantsco_api::state::AppState;
use plantsco_core::Price;

async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("parse in-memory database url")
        .foreign_keys(true);

    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect to in-memory database");

    db::MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

async fn seed_catalog(pool: &SqlitePool) {
    let products = ProductRepository::new(pool);
    products
        .create(
            "Monstera Deliciosa",
            Price::from_cents(3499),
            12,
            "monstera.jpg",
            &["low light".to_string(), "easy care".to_string()],
        )
        .await
        .expect("seed monstera");
    products
        .create(
            "Snake Plant",
            Price::from_cents(1899),
            30,
            "snake-plant.jpg",
            &["pet friendly".to_string()],
        )
        .await
        .expect("seed snake plant");
}

async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    seed_catalog(&pool).await;

    let config = Config {
        database_url: secrecy::SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        sentry_dsn: None,
    };
    let state = AppState::new(config, pool.clone());

    (routes::routes().with_state(state), pool)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("response should be JSON")
}

/// Register a user and return (token, user id).
async fn register(app: &Router, email: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({
            "firstName": "Fern",
            "lastName": "Gully",
            "email": email,
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = as_json(&body)["token"].as_str().unwrap().to_string();

    let (status, body) = send(app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let id = as_json(&body)["id"].as_i64().unwrap();

    (token, id)
}

/// Register a user and flip their admin flag directly in the store.
async fn register_admin(app: &Router, pool: &SqlitePool, email: &str) -> (String, i64) {
    let (token, id) = register(app, email).await;
    sqlx::query("UPDATE users SET is_admin = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    (token, id)
}

// ============================================================================
// Auth & registration
// ============================================================================

#[tokio::test]
async fn register_then_login_and_logout() {
    let (app, _pool) = test_app().await;
    let (_token, _id) = register(&app, "fern@plants.co").await;

    // Fresh login works
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "fern@plants.co", "password": "hunter2hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = as_json(&body)["token"].as_str().unwrap().to_string();

    // Wrong password is rejected without hinting which part was wrong
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "fern@plants.co", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout revokes the token
    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let (app, pool) = test_app().await;
    register(&app, "fern@plants.co").await;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({
            "firstName": "Copy",
            "lastName": "Cat",
            "email": "fern@plants.co",
            "password": "hunter2hunter2",
        })),
    )
    .await;
    // Unique-field conflicts surface as 401 in this API
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(String::from_utf8(body).unwrap(), "User already exists");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind("fern@plants.co")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let (app, _pool) = test_app().await;

    let (status, _) = send(&app, "GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/users/1/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Authorization guard
// ============================================================================

#[tokio::test]
async fn cart_access_scenario() {
    let (app, pool) = test_app().await;
    let (token_a, id_a) = register(&app, "a@plants.co").await;
    let (_token_b, id_b) = register(&app, "b@plants.co").await;
    let (token_admin, _) = register_admin(&app, &pool, "admin@plants.co").await;

    // User A requesting user B's cart is denied
    let (status, body) = send(&app, "GET", &format!("/users/{id_b}/cart"), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(
        String::from_utf8(body)
            .unwrap()
            .contains("Inadequate access rights")
    );

    // A's own empty cart is a 200 with an empty list
    let (status, body) = send(&app, "GET", &format!("/users/{id_a}/cart"), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));

    // Updating an item that is not in the cart is a 404, not an insert
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{id_a}/cart"),
        Some(&token_a),
        Some(json!({"productId": 1, "qty": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Add then set quantity to 3
    let (status, _) = send(
        &app,
        "POST",
        &format!("/users/{id_a}/cart"),
        Some(&token_a),
        Some(json!({"productId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{id_a}/cart"),
        Some(&token_a),
        Some(json!({"productId": 1, "qty": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["qty"], json!(3));

    // The admin sees the same cart A does
    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{id_a}/cart"),
        Some(&token_admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cart = as_json(&body);
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["qty"], json!(3));
    assert_eq!(cart[0]["product"]["name"], json!("Monstera Deliciosa"));
}

#[tokio::test]
async fn profile_access_and_elevation_guard() {
    let (app, pool) = test_app().await;
    let (token_a, id_a) = register(&app, "a@plants.co").await;
    let (_token_b, id_b) = register(&app, "b@plants.co").await;
    let (token_admin, _) = register_admin(&app, &pool, "admin@plants.co").await;

    // Reading someone else's profile is denied
    let (status, _) = send(&app, "GET", &format!("/users/{id_b}"), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A non-admin granting themselves the admin flag is denied
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{id_a}"),
        Some(&token_a),
        Some(json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // ...and so is changing their role
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{id_a}"),
        Some(&token_a),
        Some(json!({"role": "supervisor"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A plain profile edit on their own account goes through
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{id_a}"),
        Some(&token_a),
        Some(json!({"firstName": "Moss"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = as_json(&body);
    assert_eq!(updated["firstName"], json!("Moss"));
    assert!(updated.get("password").is_none());

    // Admins may elevate other users
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{id_b}"),
        Some(&token_admin),
        Some(json!({"role": "supervisor", "isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["isAdmin"], json!(true));
}

#[tokio::test]
async fn delete_user_requires_ownership() {
    let (app, _pool) = test_app().await;
    let (token_a, id_a) = register(&app, "a@plants.co").await;
    let (_token_b, id_b) = register(&app, "b@plants.co").await;

    let (status, _) = send(&app, "DELETE", &format!("/users/{id_b}"), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &format!("/users/{id_a}"), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The cascade also revoked A's tokens
    let (status, _) = send(&app, "GET", "/auth/me", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Admin aggregation views
// ============================================================================

#[tokio::test]
async fn user_listing_is_admin_only_and_excludes_passwords() {
    let (app, pool) = test_app().await;
    let (token_a, _) = register(&app, "a@plants.co").await;
    let (token_admin, _) = register_admin(&app, &pool, "admin@plants.co").await;

    let (status, _) = send(&app, "GET", "/users", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/users", Some(&token_admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = as_json(&body);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("email").is_some());
    }
}

#[tokio::test]
async fn admin_product_and_promo_listings() {
    let (app, pool) = test_app().await;
    let (token_a, _) = register(&app, "a@plants.co").await;
    let (token_admin, _) = register_admin(&app, &pool, "admin@plants.co").await;

    PromoCodeRepository::new(&pool)
        .create("SPRING20", 20)
        .await
        .unwrap();

    let (status, _) = send(&app, "GET", "/admin/products", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/admin/products", Some(&token_admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "GET", "/admin/promocodes", Some(&token_admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let codes = as_json(&body);
    assert_eq!(codes[0]["code"], json!("SPRING20"));
    assert_eq!(codes[0]["percentOff"], json!(20));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn catalog_is_public() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, "GET", "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let products = as_json(&body);
    assert_eq!(products.as_array().unwrap().len(), 2);
    assert_eq!(products[0]["price"], json!("34.99"));
    assert_eq!(products[0]["tags"][0], json!("low light"));

    let (status, _) = send(&app, "GET", "/products/1", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/products/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart mutations
// ============================================================================

#[tokio::test]
async fn add_twice_accumulates_one_row() {
    let (app, pool) = test_app().await;
    let (token, id) = register(&app, "a@plants.co").await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/users/{id}/cart"),
            Some(&token),
            Some(json!({"productId": 2, "qty": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", &format!("/users/{id}/cart"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let cart = as_json(&body);
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["qty"], json!(4));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn add_unknown_product_is_not_found() {
    let (app, _pool) = test_app().await;
    let (token, id) = register(&app, "a@plants.co").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_quantity_is_rejected_at_the_boundary() {
    let (app, _pool) = test_app().await;
    let (token, id) = register(&app, "a@plants.co").await;

    send(
        &app,
        "POST",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 1})),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 1, "qty": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The existing row is untouched
    let (_, body) = send(&app, "GET", &format!("/users/{id}/cart"), Some(&token), None).await;
    assert_eq!(as_json(&body)[0]["qty"], json!(1));
}

#[tokio::test]
async fn removed_item_never_reappears_in_cart() {
    let (app, _pool) = test_app().await;
    let (token, id) = register(&app, "a@plants.co").await;

    send(
        &app,
        "POST",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 1})),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 2})),
    )
    .await;

    // Removal returns the removed row
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["productId"], json!(1));

    let (_, body) = send(&app, "GET", &format!("/users/{id}/cart"), Some(&token), None).await;
    let cart = as_json(&body);
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["product"]["id"], json!(2));

    // Removing it again is a 404
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn empty_history_and_empty_cart_checkout() {
    let (app, _pool) = test_app().await;
    let (token, id) = register(&app, "a@plants.co").await;

    let (status, body) = send(&app, "GET", &format!("/users/{id}/orders"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));

    let (status, _) = send(&app, "POST", &format!("/users/{id}/orders"), Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_snapshots_cart_and_empties_it() {
    let (app, pool) = test_app().await;
    let (token, id) = register(&app, "a@plants.co").await;

    // 2 x Monstera ($34.99) + 1 x Snake Plant ($18.99) = $88.97
    send(
        &app,
        "POST",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 1, "qty": 2})),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/users/{id}/cart"),
        Some(&token),
        Some(json!({"productId": 2})),
    )
    .await;

    let (status, body) = send(&app, "POST", &format!("/users/{id}/orders"), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let order = as_json(&body);
    assert_eq!(order["finalPrice"], json!("88.97"));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    let order_id = order["id"].as_i64().unwrap();

    // Cart is now empty
    let (_, body) = send(&app, "GET", &format!("/users/{id}/cart"), Some(&token), None).await;
    assert_eq!(as_json(&body), json!([]));

    // History shows one order with the summed quantity
    let (status, body) = send(&app, "GET", &format!("/users/{id}/orders"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let history = as_json(&body);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["totalQty"], json!(3));
    assert_eq!(history[0]["finalPrice"], json!("88.97"));

    // A later price change does not rewrite the snapshot
    sqlx::query("UPDATE products SET price_cents = 9999 WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{id}/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order = as_json(&body);
    assert_eq!(order["items"][0]["unitPrice"], json!("34.99"));
    assert_eq!(order["finalPrice"], json!("88.97"));
}

#[tokio::test]
async fn order_history_is_newest_first_and_owner_scoped() {
    let (app, _pool) = test_app().await;
    let (token_a, id_a) = register(&app, "a@plants.co").await;
    let (token_b, id_b) = register(&app, "b@plants.co").await;

    // Two orders for A
    for product in [1, 2] {
        send(
            &app,
            "POST",
            &format!("/users/{id_a}/cart"),
            Some(&token_a),
            Some(json!({"productId": product})),
        )
        .await;
        let (status, _) =
            send(&app, "POST", &format!("/users/{id_a}/orders"), Some(&token_a), None).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", &format!("/users/{id_a}/orders"), Some(&token_a), None).await;
    let history = as_json(&body);
    let ids: Vec<i64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);

    // B cannot read A's orders, and A's orders are not visible under B's id
    let (status, _) = send(&app, "GET", &format!("/users/{id_a}/orders"), Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, body) = send(&app, "GET", &format!("/users/{id_b}/orders"), Some(&token_b), None).await;
    assert_eq!(as_json(&body), json!([]));

    let first_order = ids.last().unwrap();
    let (status, _) = send(
        &app,
        "GET",
        &format!("/users/{id_b}/orders/{first_order}"),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
