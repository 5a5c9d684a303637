//! Property tests for the cart and stock bound.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rust_decimal::Decimal;
use zeltic_core::{Cart, CartLine, Price, ProductId, SizeLabel, StockBound};

const SIZES: [&str; 4] = ["28", "30", "32", "M"];

fn line(id: i32, size: &str, quantity: u32, cents: u32) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        name: format!("Jean {id}"),
        price: Price::new(Decimal::new(i64::from(cents), 2)).unwrap(),
        size: SizeLabel::parse(size).unwrap(),
        quantity,
        image: None,
    }
}

fn arb_line() -> impl Strategy<Value = CartLine> {
    (1..6i32, 0..SIZES.len(), 1..20u32, 0..100_000u32)
        .prop_map(|(id, s, q, cents)| line(id, SIZES[s], q, cents))
}

proptest! {
    #[test]
    fn adding_same_line_twice_sums_quantity(
        id in 1..100i32,
        s in 0..SIZES.len(),
        a in 1..1_000u32,
        b in 1..1_000u32,
    ) {
        let mut cart = Cart::new();
        cart.add_item(line(id, SIZES[s], a, 5000));
        cart.add_item(line(id, SIZES[s], b, 5000));
        prop_assert_eq!(cart.len(), 1);
        prop_assert_eq!(cart.items()[0].quantity, a + b);
    }

    #[test]
    fn one_line_per_product_and_size(lines in prop::collection::vec(arb_line(), 0..30)) {
        let mut cart = Cart::new();
        for l in lines {
            cart.add_item(l);
        }
        let items = cart.items();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                prop_assert!(!(a.product_id == b.product_id && a.size == b.size));
            }
        }
    }

    #[test]
    fn total_items_is_sum_of_quantities(lines in prop::collection::vec(arb_line(), 0..30)) {
        let expected: u32 = lines.iter().map(|l| l.quantity).sum();
        let cart: Cart = lines.into_iter().fold(Cart::new(), |mut c, l| {
            c.add_item(l);
            c
        });
        prop_assert_eq!(cart.total_items(), expected);
    }

    #[test]
    fn clear_always_empties(lines in prop::collection::vec(arb_line(), 0..30)) {
        let mut cart = Cart::new();
        for l in lines {
            cart.add_item(l);
        }
        cart.clear();
        prop_assert_eq!(cart.total_items(), 0);
        prop_assert_eq!(cart.total_amount(), Decimal::ZERO);
    }

    #[test]
    fn snapshot_rehydrates_identically(lines in prop::collection::vec(arb_line(), 0..30)) {
        let mut cart = Cart::new();
        for l in lines {
            cart.add_item(l);
        }
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, cart);
    }

    #[test]
    fn string_and_number_prices_total_the_same(cents in 0..1_000_000u32, q in 1..50u32) {
        let amount = Decimal::new(i64::from(cents), 2);
        let as_text: Price = serde_json::from_str(&format!("\"${amount}\"")).unwrap();
        let as_number: Price = serde_json::from_str(&amount.to_string()).unwrap();
        prop_assert_eq!(as_text.times(q), as_number.times(q));
    }

    #[test]
    fn stock_bound_admits_exactly_one_to_n(stock in 0..500u32, q in 0..600u32) {
        let bound = StockBound::from_stock(stock);
        let selectable = bound.is_selectable(q);
        prop_assert_eq!(selectable, stock > 0 && (1..=stock).contains(&q));
    }
}
