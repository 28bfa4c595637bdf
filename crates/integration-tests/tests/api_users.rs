//! Integration tests for user registration and profile access.
//!
//! These tests require a running API server (see crate docs).
//! Run with: cargo test -p plantsco-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use plantsco_integration_tests::{api_base_url, unique_email};

/// Register a user and return their token.
async fn register(client: &Client, email: &str) -> String {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({
            "firstName": "Integration",
            "lastName": "Test",
            "email": email,
            "password": "integration-pass",
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse token response");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_register_and_fetch_own_profile() {
    let client = Client::new();
    let base_url = api_base_url();
    let email = unique_email("profile");

    let token = register(&client, &email).await;

    let resp = client
        .get(format!("{base_url}/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch profile");

    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(profile["email"], json!(email));
    assert!(profile.get("password").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_user_listing_requires_admin() {
    let client = Client::new();
    let base_url = api_base_url();

    let token = register(&client, &unique_email("non-admin")).await;

    let resp = client
        .get(format!("{base_url}/users"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to request user listing");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_duplicate_registration_is_rejected() {
    let client = Client::new();
    let base_url = api_base_url();
    let email = unique_email("duplicate");

    register(&client, &email).await;

    let resp = client
        .post(format!("{base_url}/users"))
        .json(&json!({
            "firstName": "Second",
            "lastName": "Copy",
            "email": email,
            "password": "integration-pass",
        }))
        .send()
        .await
        .expect("Failed to send duplicate registration");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
