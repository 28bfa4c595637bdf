//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check (in main)
//! GET  /health/ready              - Readiness check (in main)
//!
//! # Users
//! GET    /users                   - All users, admin only
//! POST   /users                   - Register, returns auth token
//! GET    /users/{userId}          - Profile + cart products, self or admin
//! PUT    /users/{userId}          - Update profile; blocks self-elevation
//! DELETE /users/{userId}          - Delete user, self or admin
//!
//! # Cart
//! GET    /users/{id}/cart         - Cart contents, self or admin
//! POST   /users/{id}/cart         - Add item (insert or increment)
//! PUT    /users/{id}/cart         - Set item quantity
//! DELETE /users/{id}/cart         - Remove item, returns removed row
//!
//! # Orders
//! GET  /users/{id}/orders         - Order history, newest first
//! POST /users/{id}/orders         - Checkout: create order from cart
//! GET  /users/{id}/orders/{orderId} - Order detail with line items
//!
//! # Auth
//! POST /auth/login                - Login, returns token
//! POST /auth/logout               - Revoke token
//! GET  /auth/me                   - Current user profile
//!
//! # Catalog (public)
//! GET  /products                  - Product listing
//! GET  /products/{productId}      - Product detail
//!
//! # Admin
//! GET  /admin/products            - Full product listing, admin only
//! GET  /admin/promocodes          - Promo code listing, admin only
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the user routes router (profile, cart, and orders).
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route(
            "/{user_id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
        .route(
            "/{user_id}/cart",
            get(cart::show)
                .post(cart::add)
                .put(cart::update)
                .delete(cart::remove),
        )
        .route("/{user_id}/orders", get(orders::index).post(orders::create))
        .route("/{user_id}/orders/{order_id}", get(orders::show))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the public catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{product_id}", get(products::show))
}

/// Create the admin aggregation routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::products))
        .route("/promocodes", get(admin::promo_codes))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/admin", admin_routes())
}
