//! Collaborator traits
//!
//! The engine never touches a widget toolkit or a BLE controller directly.
//! The board support package implements these traits for its display stack
//! and its GATT server.

pub mod display;
pub mod transport;

pub use display::{BridgeError, DisplayBridge, OrderRow, Placeholder};
pub use transport::{BleTransport, TransportError};
