//! BLE transport trait for the notify characteristic

/// Errors from the BLE transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No central connected, or it did not subscribe
    NotConnected,
    /// The stack refused the notification (stack-specific code)
    Rejected(i32),
}

/// Trait for the GATT server's notify side
pub trait BleTransport {
    /// Whether a central is connected
    fn is_connected(&self) -> bool;

    /// Send a notification on the acknowledgment characteristic
    fn notify(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}
