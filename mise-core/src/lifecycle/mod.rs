//! Order lifecycle
//!
//! Applies decoded commands to the order store and display, and handles
//! the operator's "ready" action. Every command either takes full effect or
//! is dropped with a reason; nothing is partially applied.

pub mod controller;
pub mod outcome;

pub use controller::Kitchen;
pub use outcome::{Delivery, DropReason, Effect, Outcome, ReadyError};
