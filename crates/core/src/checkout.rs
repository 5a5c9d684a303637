//! Checkout handoff.
//!
//! Checkout takes no payment. It validates the customer's contact details,
//! writes an order summary and hands it to an external chat channel as a
//! prefilled message. The cart is emptied as soon as the handoff starts,
//! whether or not the channel accepted it. Stock is not re-checked here.

use core::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::{Price, format_amount};

/// Required contact field, for validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    LastName,
    Phone,
    Address,
    PostalCode,
}

impl ContactField {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LastName => "last name",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::PostalCode => "postal code",
        }
    }
}

/// Why a checkout was refused. Nothing is sent and the cart is untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("please fill in the {}", .0.label())]
    MissingField(ContactField),
    #[error("your cart is empty")]
    EmptyCart,
}

/// Shipping and contact details typed by the customer.
///
/// Absent fields deserialize as blank so validation can name them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub notes: Option<String>,
}

impl ContactDetails {
    /// Check that every required field has non-blank text.
    ///
    /// # Errors
    ///
    /// Returns the first missing field in form order.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            (ContactField::Name, &self.name),
            (ContactField::LastName, &self.last_name),
            (ContactField::Phone, &self.phone),
            (ContactField::Address, &self.address),
            (ContactField::PostalCode, &self.postal_code),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CheckoutError::MissingField(*field)),
            None => Ok(()),
        }
    }

    /// Notes with surrounding whitespace removed, `None` if blank.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// Where order messages are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffTarget {
    phone_number: String,
    store_name: String,
}

impl HandoffTarget {
    /// Base of the chat deep link.
    pub const CHAT_BASE_URL: &'static str = "https://wa.me/";

    /// `phone_number` may contain `+`, spaces or dashes; only digits are kept.
    #[must_use]
    pub fn new(phone_number: &str, store_name: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.chars().filter(char::is_ascii_digit).collect(),
            store_name: store_name.into(),
        }
    }

    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Deep link carrying `message` as the prefilled text.
    #[must_use]
    pub fn link(&self, message: &str) -> String {
        format!(
            "{}{}?text={}",
            Self::CHAT_BASE_URL,
            self.phone_number,
            urlencoding::encode(message)
        )
    }
}

/// Build the order message for `lines` in cart order.
#[must_use]
pub fn compose_message(
    store_name: &str,
    contact: &ContactDetails,
    lines: &[CartLine],
    total: Decimal,
) -> String {
    let sym = Price::SYMBOL;
    let mut msg = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(msg, "*NEW ORDER - {store_name}*");
    let _ = writeln!(msg);
    let _ = writeln!(msg, "*Customer details:*");
    let _ = writeln!(msg, "Name: {} {}", contact.name.trim(), contact.last_name.trim());
    let _ = writeln!(msg, "Phone: {}", contact.phone.trim());
    let _ = writeln!(msg, "Address: {}", contact.address.trim());
    let _ = writeln!(msg, "Postal code: {}", contact.postal_code.trim());
    if let Some(notes) = contact.notes() {
        let _ = writeln!(msg, "Notes: {notes}");
    }
    let _ = writeln!(msg);
    let _ = writeln!(msg, "*Products:*");
    for line in lines {
        let _ = writeln!(
            msg,
            "- {} (Size {}) x {} = {sym}{} each",
            line.name, line.size, line.quantity, line.price
        );
    }
    let _ = writeln!(msg);
    let _ = write!(msg, "*Total: {sym}{}*", format_amount(total));
    msg
}

/// Result of opening the chat channel. Only informational: the cart is
/// already empty by the time this is known.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("chat channel unavailable: {0}")]
pub struct ChannelError(pub String);

/// Something that can open a deep link for the customer.
pub trait HandoffChannel {
    /// Open `url`. Implementations must not block on a reply.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the link could not be opened.
    fn open(&self, url: &str) -> Result<(), ChannelError>;
}

/// What was handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    pub url: String,
    pub message: String,
    pub contact: ContactDetails,
    pub lines: Vec<CartLine>,
    pub total: Price,
    /// Whether the channel reported opening the link.
    pub delivered: bool,
}

/// Validate, build the message, open the channel and clear the cart.
///
/// # Errors
///
/// Returns [`CheckoutError`] when a required field is blank or the cart is
/// empty; in that case the cart is left as it was.
pub fn hand_off<C>(
    cart: &mut Cart,
    contact: ContactDetails,
    target: &HandoffTarget,
    channel: &C,
) -> Result<Handoff, CheckoutError>
where
    C: HandoffChannel + ?Sized,
{
    contact.validate()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let lines = cart.items().to_vec();
    let total_amount = cart.total_amount();
    let message = compose_message(target.store_name(), &contact, &lines, total_amount);
    let url = target.link(&message);

    let delivered = channel.open(&url).is_ok();
    cart.clear();

    Ok(Handoff {
        url,
        message,
        contact,
        lines,
        total: Price::new(total_amount).unwrap_or(Price::ZERO),
        delivered,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::types::{ProductId, SizeLabel};

    struct Recorder {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Recorder {
        fn new(fail: bool) -> Self {
            Self {
                opened: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl HandoffChannel for Recorder {
        fn open(&self, url: &str) -> Result<(), ChannelError> {
            self.opened.borrow_mut().push(url.to_owned());
            if self.fail {
                Err(ChannelError("popup blocked".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Ana".to_owned(),
            last_name: "Gómez".to_owned(),
            phone: "11 5555 0000".to_owned(),
            address: "Av. Siempre Viva 742".to_owned(),
            postal_code: "1405".to_owned(),
            notes: None,
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        for (id, size, qty) in [(7, "32", 2), (3, "M", 1)] {
            cart.add_item(CartLine {
                product_id: ProductId::new(id),
                name: format!("Jean {id}"),
                price: Price::parse("$50.00").unwrap(),
                size: SizeLabel::parse(size).unwrap(),
                quantity: qty,
                image: None,
            });
        }
        cart
    }

    fn target() -> HandoffTarget {
        HandoffTarget::new("+54 9 11 4046-1805", "ZELTIC JEANS")
    }

    #[test]
    fn successful_handoff_empties_cart() {
        let mut cart = cart();
        let channel = Recorder::new(false);
        let handoff = hand_off(&mut cart, contact(), &target(), &channel).unwrap();

        assert_eq!(cart.total_items(), 0);
        assert!(handoff.delivered);
        assert_eq!(handoff.lines.len(), 2);
        assert_eq!(handoff.total.to_string(), "150.00");
        assert_eq!(channel.opened.borrow().as_slice(), [handoff.url.clone()]);
    }

    #[test]
    fn failed_channel_still_empties_cart() {
        let mut cart = cart();
        let handoff = hand_off(&mut cart, contact(), &target(), &Recorder::new(true)).unwrap();
        assert!(!handoff.delivered);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn missing_field_leaves_cart_untouched() {
        let mut cart = cart();
        let before = cart.clone();
        let channel = Recorder::new(false);
        let mut details = contact();
        details.postal_code = "   ".to_owned();

        let err = hand_off(&mut cart, details, &target(), &channel).unwrap_err();
        assert_eq!(err, CheckoutError::MissingField(ContactField::PostalCode));
        assert_eq!(cart, before);
        assert!(channel.opened.borrow().is_empty());
    }

    #[test]
    fn empty_cart_is_refused() {
        let mut cart = Cart::new();
        let err = hand_off(&mut cart, contact(), &target(), &Recorder::new(false)).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn message_lists_lines_in_cart_order() {
        let mut cart = cart();
        let mut details = contact();
        details.notes = Some("  ring twice ".to_owned());
        let handoff = hand_off(&mut cart, details, &target(), &Recorder::new(false)).unwrap();

        let expected = "*NEW ORDER - ZELTIC JEANS*\n\n\
            *Customer details:*\n\
            Name: Ana Gómez\n\
            Phone: 11 5555 0000\n\
            Address: Av. Siempre Viva 742\n\
            Postal code: 1405\n\
            Notes: ring twice\n\n\
            *Products:*\n\
            - Jean 7 (Size 32) x 2 = $50.00 each\n\
            - Jean 3 (Size M) x 1 = $50.00 each\n\n\
            *Total: $150.00*";
        assert_eq!(handoff.message, expected);
    }

    #[test]
    fn link_is_percent_encoded() {
        let url = target().link("a b\n*c*");
        assert_eq!(url, "https://wa.me/5491140461805?text=a%20b%0A%2Ac%2A");
    }

    #[test]
    fn notes_line_omitted_when_blank() {
        let mut details = contact();
        details.notes = Some("   ".to_owned());
        let msg = compose_message("X", &details, &[], Decimal::ZERO);
        assert!(!msg.contains("Notes:"));
    }
}
