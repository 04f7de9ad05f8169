//! Board-agnostic order engine for the Mise kitchen display
//!
//! This crate contains everything between a decoded BLE write and the
//! widgets on the pass, without depending on a concrete display stack or
//! BLE controller:
//!
//! - Display bridge and BLE transport traits
//! - Order store (ordered, unique, bounded)
//! - Lifecycle controller (add/update/remove/mark ready)
//! - Completion notifier
//! - Shared access under the display lock
//! - Configuration types and TOML loading

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod config;
pub mod lifecycle;
pub mod notifier;
pub mod order;
pub mod shared;
pub mod store;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use lifecycle::{Delivery, DropReason, Effect, Kitchen, Outcome, ReadyError};
pub use order::{order_number, Order, OrderStatus};
pub use shared::{Busy, SharedKitchen};
pub use store::{OrderStore, StoreError, MAX_ORDERS};
