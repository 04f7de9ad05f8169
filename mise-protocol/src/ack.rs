//! Outbound completion acknowledgment
//!
//! Sent as a GATT notification when the operator marks a ticket ready:
//!
//! ```text
//! {"orderId":"<id>","status":true}
//! ```

use alloc::vec::Vec;
use serde::Serialize;

/// Upper bound for an encoded acknowledgment, sized for the notify MTU the
/// sending app negotiates
pub const MAX_ACK_LEN: usize = 128;

/// Acknowledgment encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckError {
    /// Serialization failed
    Encode,
    /// Encoded form exceeds `MAX_ACK_LEN`
    TooLarge,
}

/// Completion event for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionAck<'a> {
    #[serde(rename = "orderId")]
    pub order_id: &'a str,
    pub status: bool,
}

impl<'a> CompletionAck<'a> {
    /// Acknowledge that an order has been served
    pub fn completed(order_id: &'a str) -> Self {
        Self {
            order_id,
            status: true,
        }
    }

    /// Serialize to the JSON wire form
    pub fn to_vec(&self) -> Result<Vec<u8>, AckError> {
        let bytes = serde_json::to_vec(self).map_err(|_| AckError::Encode)?;
        if bytes.len() > MAX_ACK_LEN {
            return Err(AckError::TooLarge);
        }
        Ok(bytes)
    }
}
