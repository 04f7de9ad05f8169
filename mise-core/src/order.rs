//! Order entries and display numbers

use alloc::string::String;
use alloc::vec::Vec;

/// Order status
///
/// The only transition is `Pending -> Completed`. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

/// A live order held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order<H> {
    pub(crate) order_id: String,
    pub(crate) order_number: u32,
    pub(crate) dishes: Vec<String>,
    pub(crate) status: OrderStatus,
    pub(crate) ui_handle: Option<H>,
}

impl<H: Copy> Order<H> {
    /// Sender-assigned identifier, unique within the store
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Short number shown on the row
    pub fn order_number(&self) -> u32 {
        self.order_number
    }

    /// Dish names in payload order
    pub fn dishes(&self) -> &[String] {
        &self.dishes
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Handle of the row widget, `None` once the row is destroyed
    pub fn ui_handle(&self) -> Option<H> {
        self.ui_handle
    }
}

/// Derive the short display number from an order id
///
/// Senders usually suffix ids with a running counter (`ord_20240611_0042`),
/// so the last four characters are tried first. If they don't start with a
/// positive integer, the whole id is tried. Anything else shows as 1.
pub fn order_number(order_id: &str) -> u32 {
    let chars = order_id.chars().count();
    if chars > 4 {
        let tail = order_id
            .char_indices()
            .nth(chars - 4)
            .map_or(order_id, |(i, _)| &order_id[i..]);
        if let Some(n) = leading_positive(tail) {
            return n;
        }
    }
    leading_positive(order_id).unwrap_or(1)
}

/// Parse a leading integer the way C's `atoi` does, keeping it only if positive
fn leading_positive(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: u32 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }

    if !seen || negative || value == 0 {
        None
    } else {
        Some(value)
    }
}
