//! The customer's cart.
//!
//! A [`Cart`] is a plain ordered collection of [`CartLine`]s, one per
//! `(product, size)`. It never consults inventory: quantities are whatever
//! the caller added, so a cart can drift out of date with stock. Callers own
//! persistence; the snapshot format is the serde form of [`Cart`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, SizeLabel, format_amount};

/// Namespace the cart snapshot is stored under.
pub const CART_NAMESPACE: &str = "zeltic-cart";

/// One `(product, size)` selection.
///
/// Name, price and image are copied when the line is created and are not
/// refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub size: SizeLabel,
    pub quantity: u32,
    pub image: Option<String>,
}

impl CartLine {
    /// Whether this line is the one for `(product_id, size)`.
    #[must_use]
    pub fn is(&self, product_id: ProductId, size: &SizeLabel) -> bool {
        self.product_id == product_id && self.size == *size
    }

    /// `price × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * self.quantity
    }
}

/// Ordered cart lines, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Add a selection, merging into the existing line for the same
    /// `(product, size)` by summing quantities.
    pub fn add_item(&mut self, line: CartLine) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.is(line.product_id, &line.size))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.items.push(line),
        }
    }

    /// Remove the line for `(product_id, size)` if there is one.
    pub fn remove_item(&mut self, product_id: ProductId, size: &SizeLabel) {
        self.items.retain(|line| !line.is(product_id, size));
    }

    /// Overwrite the quantity of the matching line.
    ///
    /// A zero quantity is stored as given; dropping the line is the caller's
    /// decision via [`Cart::remove_item`].
    pub fn update_quantity(&mut self, product_id: ProductId, size: &SizeLabel, quantity: u32) {
        if let Some(line) = self.items.iter_mut().find(|line| line.is(product_id, size)) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(CartLine::subtotal).sum()
    }

    /// Cart total with two decimal places, e.g. `"200.00"`.
    #[must_use]
    pub fn total(&self) -> String {
        format_amount(self.total_amount())
    }

    /// Units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity))
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(items: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in items {
            cart.add_item(line);
        }
        cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, size: &str, quantity: u32, price: &str) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Jean {id}"),
            price: Price::parse(price).unwrap(),
            size: SizeLabel::parse(size).unwrap(),
            quantity,
            image: None,
        }
    }

    fn size(s: &str) -> SizeLabel {
        SizeLabel::parse(s).unwrap()
    }

    #[test]
    fn worked_example() {
        let mut cart = Cart::new();
        cart.add_item(line(7, "32", 2, "$50.00"));
        cart.add_item(line(7, "34", 1, "$50.00"));
        cart.add_item(line(7, "32", 1, "$50.00"));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].size.as_str(), "32");
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.items()[1].quantity, 1);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total(), "200.00");

        cart.remove_item(ProductId::new(7), &size("34"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), "150.00");

        cart.clear();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total(), "0.00");
    }

    #[test]
    fn same_product_different_size_are_distinct_lines() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "S", 1, "10"));
        cart.add_item(line(1, "M", 1, "10"));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn remove_absent_line_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "30", 1, "10"));
        cart.remove_item(ProductId::new(2), &size("30"));
        cart.remove_item(ProductId::new(1), &size("31"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn update_quantity_keeps_zero_lines() {
        let mut cart = Cart::new();
        cart.add_item(line(1, "30", 4, "10"));
        cart.update_quantity(ProductId::new(1), &size("30"), 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 0);

        cart.update_quantity(ProductId::new(9), &size("30"), 5);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn remove_then_add_starts_from_new_quantity() {
        let mut cart = Cart::new();
        cart.add_item(line(3, "L", 5, "10"));
        cart.remove_item(ProductId::new(3), &size("L"));
        cart.add_item(line(3, "L", 2, "10"));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn mixed_price_representations_total_the_same() {
        let mut text = Cart::new();
        text.add_item(line(1, "30", 1, "$10.00"));
        let mut number = Cart::new();
        let mut l = line(1, "30", 1, "0");
        l.price = serde_json::from_str("10").unwrap();
        number.add_item(l);
        assert_eq!(text.total(), number.total());
    }

    #[test]
    fn snapshot_rehydrates_in_order() {
        let mut cart = Cart::new();
        cart.add_item(line(9, "42", 1, "$12.50"));
        cart.add_item(line(2, "28", 3, "80"));
        cart.add_item(line(5, "XL", 2, "$7"));

        let snapshot = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.items(), cart.items());
    }

    #[test]
    fn snapshot_accepts_legacy_price_strings() {
        let legacy = r#"{"items":[{"id":7,"name":"Baggy","price":"$50.00","size":"32","quantity":2,"image":"/a.jpg"}]}"#;
        let cart: Cart = serde_json::from_str(legacy).unwrap();
        assert_eq!(cart.total(), "100.00");
    }
}
