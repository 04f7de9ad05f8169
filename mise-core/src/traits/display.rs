//! Display bridge trait
//!
//! The bridge owns every widget on screen. The engine only holds opaque
//! handles to order rows and asks the bridge to create, refresh, grey out
//! or destroy them.
//!
//! All bridge calls happen with the display lock held, see
//! [`SharedKitchen`](crate::shared::SharedKitchen).

use alloc::string::String;
use embassy_time::Duration;

/// Errors reported by the display bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// No room left for another widget
    OutOfResources,
    /// The handle no longer refers to a live widget
    Detached,
}

/// Full-screen hint shown while the order list is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Placeholder {
    /// No central has connected yet
    AwaitingLink,
    /// Connected, but no orders are live
    AwaitingOrders,
}

/// What an order row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRow<'a> {
    pub order_id: &'a str,
    pub order_number: u32,
    pub dishes: &'a [String],
}

/// Trait for the widget layer behind the order list
pub trait DisplayBridge {
    /// Opaque reference to an order row widget
    type Handle: Copy + PartialEq;

    /// Create a row at the top of the list
    ///
    /// A failure leaves the screen unchanged.
    fn create_order_row(&mut self, row: &OrderRow<'_>) -> Result<Self::Handle, BridgeError>;

    /// Replace the number and dish list of an existing row
    fn update_order_row(
        &mut self,
        handle: Self::Handle,
        row: &OrderRow<'_>,
    ) -> Result<(), BridgeError>;

    /// Remove the row's action button and show it as completed
    fn mark_row_completed(&mut self, handle: Self::Handle) -> Result<(), BridgeError>;

    /// Destroy the row widget
    ///
    /// The handle must not be used again afterwards.
    fn destroy_order_row(&mut self, handle: Self::Handle);

    /// Show a placeholder in place of the (empty) order list
    fn show_placeholder(&mut self, placeholder: Placeholder);

    /// Hide the placeholder, if one is shown
    fn hide_placeholder(&mut self);

    /// Show a popup that dismisses itself `duration` after it first reaches
    /// the screen
    fn show_transient_message(&mut self, text: &str, duration: Duration);

    /// Update the connection indicator
    fn show_link_status(&mut self, connected: bool);
}
