//! Session-bound cart store.
//!
//! Each request rehydrates the cart from the session, applies one operation
//! and writes the whole snapshot back. Snapshot reads and writes never fail a
//! request: a broken snapshot is logged and treated as an empty cart. A failed
//! write is reported to Sentry and the in-memory cart falls back to the last
//! stored snapshot, so responses only ever show what the session holds.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use tower_sessions::session;
use tracing::{error, info, warn};
use zeltic_core::{
    Cart, CartLine, ChannelError, CheckoutError, ContactDetails, Handoff, HandoffChannel,
    HandoffTarget, ProductId, SizeLabel,
};

use crate::error::AppError;
use crate::models::session_keys;

/// The cart of one session.
pub struct SessionCart {
    session: Session,
    cart: Cart,
    /// Last snapshot known to be in the session.
    stored: Cart,
}

impl SessionCart {
    /// Rehydrate the cart stored in `session`.
    pub async fn load(session: Session) -> Self {
        let cart = match session.get::<Cart>(session_keys::CART).await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart snapshot");
                Cart::default()
            }
        };
        Self {
            session,
            stored: cart.clone(),
            cart,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn add_item(&mut self, line: CartLine) {
        self.cart.add_item(line);
        self.persist().await;
    }

    pub async fn remove_item(&mut self, product_id: ProductId, size: &SizeLabel) {
        self.cart.remove_item(product_id, size);
        self.persist().await;
    }

    pub async fn update_quantity(&mut self, product_id: ProductId, size: &SizeLabel, quantity: u32) {
        self.cart.update_quantity(product_id, size, quantity);
        self.persist().await;
    }

    pub async fn clear(&mut self) {
        self.cart.clear();
        self.persist().await;
    }

    /// Run the checkout handoff and persist the emptied cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] on validation failure; nothing is persisted.
    pub async fn hand_off<C>(
        &mut self,
        contact: ContactDetails,
        target: &HandoffTarget,
        channel: &C,
    ) -> Result<Handoff, CheckoutError>
    where
        C: HandoffChannel + ?Sized,
    {
        let handoff = zeltic_core::hand_off(&mut self.cart, contact, target, channel)?;
        self.persist().await;
        Ok(handoff)
    }

    async fn persist(&mut self) {
        let written = self.session.insert(session_keys::CART, &self.cart).await;
        self.settle(written);
    }

    fn settle(&mut self, written: Result<(), session::Error>) {
        match written {
            Ok(()) => self.stored.clone_from(&self.cart),
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                error!(
                    error = %e,
                    event_id = %event_id,
                    items = self.cart.len(),
                    "Failed to persist cart snapshot"
                );
                self.cart.clone_from(&self.stored);
            }
        }
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_owned()))?;
        Ok(Self::load(session).await)
    }
}

/// Hands the chat link back to the browser, which opens it.
///
/// The server cannot observe whether the customer actually sends the
/// message, so opening always succeeds from here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientRedirect;

impl HandoffChannel for ClientRedirect {
    fn open(&self, url: &str) -> Result<(), ChannelError> {
        info!(url_len = url.len(), "Handing checkout off to chat");
        Ok(())
    }
}
