//! Text-mode display for the Mise kitchen display
//!
//! This crate provides:
//! - `Screen`, a character buffer with per-line styles
//! - `DisplayBackend` trait for the panel driver that draws a `Screen`
//! - `TextBridge`, a `DisplayBridge` that keeps order rows, placeholder,
//!   link indicator and popups, and lays them out on a `Screen`
//!
//! # Architecture
//!
//! The engine talks to `TextBridge` with the display lock held. The render
//! task sleeps until either the engine requests a redraw or the bridge's
//! [`TextBridge::next_deadline`] passes. It then takes the same lock and
//! calls [`TextBridge::refresh`] with the current time. The bridge redraws
//! only when something changed or a popup expired.
//!
//! ```text
//! ┌─────────────────────┐
//! │Mise            BT OK│  status line
//! │#42 Ramen、Gyoza     │  order rows, newest first
//! │#41 Udon             │  (completed rows dimmed)
//! │     订单已添加       │  popup overlay
//! │...                  │
//! └─────────────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod bridge;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use bridge::{RowId, TextBridge, MAX_POPUPS, MAX_ROWS};
pub use screen::{LineStyle, Screen, SCREEN_COLS, SCREEN_ROWS};
