//! Completion notifier
//!
//! Sends `{"orderId":"<id>","status":true}` on the notify characteristic
//! when an order is marked ready. There are no retries: a failed
//! notification is reported to the caller and forgotten.

use mise_protocol::{AckError, CompletionAck};

use crate::traits::{BleTransport, TransportError};

/// Errors from sending a completion acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyError {
    /// No central is connected
    NotConnected,
    /// The acknowledgment could not be encoded
    Encode,
    /// The transport refused the notification
    Transport(TransportError),
}

impl From<AckError> for NotifyError {
    fn from(_: AckError) -> Self {
        NotifyError::Encode
    }
}

impl From<TransportError> for NotifyError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NotConnected => NotifyError::NotConnected,
            other => NotifyError::Transport(other),
        }
    }
}

/// Sends completion acknowledgments over a BLE transport
#[derive(Debug)]
pub struct Notifier<T> {
    transport: T,
    sent: u32,
    failed: u32,
}

impl<T: BleTransport> Notifier<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            failed: 0,
        }
    }

    /// Tell the connected central that `order_id` is ready
    pub fn notify_complete(&mut self, order_id: &str) -> Result<(), NotifyError> {
        let result = self.send(order_id);
        match result {
            Ok(()) => self.sent = self.sent.wrapping_add(1),
            Err(_) => self.failed = self.failed.wrapping_add(1),
        }
        result
    }

    fn send(&mut self, order_id: &str) -> Result<(), NotifyError> {
        if !self.transport.is_connected() {
            return Err(NotifyError::NotConnected);
        }
        let payload = CompletionAck::completed(order_id).to_vec()?;
        self.transport.notify(&payload)?;
        trace!("ack sent ({} bytes)", payload.len());
        Ok(())
    }

    /// Acknowledgments delivered to the transport
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Acknowledgments that could not be delivered
    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
