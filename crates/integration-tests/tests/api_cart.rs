//! Integration tests for the cart and checkout flow.
//!
//! These tests require a running API server with a seeded catalog
//! (see crate docs). Run with:
//! cargo test -p plantsco-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use plantsco_integration_tests::{api_base_url, unique_email};

/// Register a user and return (token, user id).
async fn register(client: &Client) -> (String, i64) {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({
            "firstName": "Cart",
            "lastName": "Tester",
            "email": unique_email("cart"),
            "password": "integration-pass",
        }))
        .send()
        .await
        .expect("Failed to register test user");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let me: Value = client
        .get(format!("{base_url}/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch profile")
        .json()
        .await
        .unwrap();

    (token, me["id"].as_i64().unwrap())
}

/// First product id from the public catalog.
async fn first_product_id(client: &Client) -> i64 {
    let base_url = api_base_url();
    let catalog: Value = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to fetch catalog")
        .json()
        .await
        .unwrap();
    let products = catalog.as_array().expect("catalog should be a list");
    assert!(!products.is_empty(), "catalog must be seeded");
    products[0]["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "Requires running API server with seeded catalog"]
async fn test_add_update_remove_cart_item() {
    let client = Client::new();
    let base_url = api_base_url();
    let (token, user_id) = register(&client).await;
    let product_id = first_product_id(&client).await;

    // Add
    let resp = client
        .post(format!("{base_url}/users/{user_id}/cart"))
        .bearer_auth(&token)
        .json(&json!({"productId": product_id, "qty": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Update quantity
    let resp = client
        .put(format!("{base_url}/users/{user_id}/cart"))
        .bearer_auth(&token)
        .json(&json!({"productId": product_id, "qty": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let item: Value = resp.json().await.unwrap();
    assert_eq!(item["qty"], json!(5));

    // Remove
    let resp = client
        .delete(format!("{base_url}/users/{user_id}/cart"))
        .bearer_auth(&token)
        .json(&json!({"productId": product_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Cart is empty again
    let cart: Value = client
        .get(format!("{base_url}/users/{user_id}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart, json!([]));
}

#[tokio::test]
#[ignore = "Requires running API server with seeded catalog"]
async fn test_checkout_creates_order_and_empties_cart() {
    let client = Client::new();
    let base_url = api_base_url();
    let (token, user_id) = register(&client).await;
    let product_id = first_product_id(&client).await;

    client
        .post(format!("{base_url}/users/{user_id}/cart"))
        .bearer_auth(&token)
        .json(&json!({"productId": product_id, "qty": 3}))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base_url}/users/{user_id}/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let orders: Value = client
        .get(format!("{base_url}/users/{user_id}/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["totalQty"], json!(3));

    let cart: Value = client
        .get(format!("{base_url}/users/{user_id}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart, json!([]));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_cross_user_cart_access_is_denied() {
    let client = Client::new();
    let base_url = api_base_url();
    let (token_a, _) = register(&client).await;
    let (_token_b, id_b) = register(&client).await;

    let resp = client
        .get(format!("{base_url}/users/{id_b}/cart"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
