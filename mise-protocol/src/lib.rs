//! Mise BLE Order Protocol
//!
//! This crate defines what travels over the kitchen display's GATT service:
//! JSON order events written by the ordering app to the write
//! characteristic, and completion acknowledgments sent back on the notify
//! characteristic.
//!
//! # Protocol Overview
//!
//! ```text
//! app ──write──▶ {"type":"add","orderId":"o1","items":[{"name":"Ramen"}]}
//! app ◀─notify── {"orderId":"o1","status":true}
//! app ──read───▶ "OK"
//! ```
//!
//! Writes arrive as single, possibly truncated buffers of at most
//! [`MAX_WRITE_LEN`] bytes. Decoding is tolerant: malformed input never
//! produces an error, only [`Command::Unrecognized`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod ack;
pub mod decoder;
pub mod fallback;
pub mod hex_text;

pub use ack::{AckError, CompletionAck, MAX_ACK_LEN};
pub use decoder::{decode, decode_detailed, Command, DecodePath, Decoded, MAX_WRITE_LEN};

/// Value returned when the write characteristic is read
pub const READ_RESPONSE: &[u8] = b"OK";
