//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Readiness (database)
//!
//! # Catalog
//! GET    /api/products?category=&tag=     - Listing plus tag choices
//! GET    /api/products/{id}               - Detail with size picker
//! GET    /api/products/{id}/stock?size=&quantity= - Quantity stepper
//!
//! # Cart (session)
//! GET    /api/cart                        - Lines and totals
//! POST   /api/cart/add                    - Add a size/quantity
//! POST   /api/cart/update                 - Set quantity (<= 0 removes)
//! POST   /api/cart/remove                 - Remove a line
//! POST   /api/cart/clear                  - Empty the cart
//! GET    /api/cart/count                  - Units in the cart
//!
//! # Checkout
//! POST   /api/checkout                    - Chat handoff, records an order
//!
//! # Auth
//! POST   /api/auth/register               - Customer sign-up, signs in
//! POST   /api/auth/login                  - Email/password login
//! POST   /api/auth/logout                 - Drop identity, keep cart
//! GET    /api/auth/me                     - Signed-in identity
//!
//! # Admin (requires the admin capability)
//! GET    /api/admin/products?q=           - Search
//! POST   /api/admin/products              - Create
//! PATCH  /api/admin/products/{id}         - Update
//! DELETE /api/admin/products/{id}         - Delete
//! PUT    /api/admin/inventory             - Set one slot
//! POST   /api/admin/inventory/batch       - Save a batch of edits
//! GET    /api/admin/inventory/pending     - Staged edits with preview
//! PUT    /api/admin/inventory/pending     - Stage one edit
//! DELETE /api/admin/inventory/pending     - Drop one staged edit
//! POST   /api/admin/inventory/pending/save - Save staged edits
//! GET    /api/admin/orders                - Newest first
//! GET    /api/admin/orders/{id}           - One order
//! PATCH  /api/admin/orders/{id}/status    - Set status
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/stock", get(products::stock))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register).layer(auth_rate_limiter()))
        .route("/login", post(auth::login).layer(auth_rate_limiter()))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let shopping = Router::new()
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout))
        .layer(api_rate_limiter());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .nest("/api/products", product_routes())
        .nest("/api", shopping)
        .nest("/api/auth", auth_routes())
        .nest("/api/admin", admin::routes())
}
