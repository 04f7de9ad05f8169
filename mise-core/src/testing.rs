//! Recording doubles for the display bridge and BLE transport

use alloc::string::String;
use alloc::vec::Vec;

use embassy_time::Duration;

use crate::traits::{BleTransport, BridgeError, DisplayBridge, OrderRow, Placeholder, TransportError};

pub fn dishes(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| String::from(*n)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    Create(u32, String),
    Update(u32, Vec<String>),
    Complete(u32),
    Destroy(u32),
    ShowPlaceholder(Placeholder),
    HidePlaceholder,
    Message(String, Duration),
    Link(bool),
}

#[derive(Debug, Default)]
pub struct MockBridge {
    calls: Vec<BridgeCall>,
    /// Live rows, top first: (handle, order id)
    rows: Vec<(u32, String)>,
    next_handle: u32,
    fail_create: bool,
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            next_handle: 100,
            ..Default::default()
        }
    }

    pub fn fail_next_create(&mut self) {
        self.fail_create = true;
    }

    pub fn calls(&self) -> &[BridgeCall] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<&BridgeCall> {
        self.calls.last()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Order ids of live rows, top first
    pub fn rows(&self) -> Vec<&str> {
        self.rows.iter().map(|(_, id)| id.as_str()).collect()
    }

    pub fn created(&self) -> usize {
        self.count(|c| matches!(c, BridgeCall::Create(..)))
    }

    pub fn destroyed(&self) -> usize {
        self.count(|c| matches!(c, BridgeCall::Destroy(_)))
    }

    pub fn completed(&self) -> usize {
        self.count(|c| matches!(c, BridgeCall::Complete(_)))
    }

    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BridgeCall::Message(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, f: impl Fn(&BridgeCall) -> bool) -> usize {
        self.calls.iter().filter(|c| f(*c)).count()
    }

    fn live(&self, handle: u32) -> Result<(), BridgeError> {
        if self.rows.iter().any(|(h, _)| *h == handle) {
            Ok(())
        } else {
            Err(BridgeError::Detached)
        }
    }
}

impl DisplayBridge for MockBridge {
    type Handle = u32;

    fn create_order_row(&mut self, row: &OrderRow<'_>) -> Result<u32, BridgeError> {
        if core::mem::take(&mut self.fail_create) {
            return Err(BridgeError::OutOfResources);
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.rows.insert(0, (handle, String::from(row.order_id)));
        self.calls
            .push(BridgeCall::Create(handle, String::from(row.order_id)));
        Ok(handle)
    }

    fn update_order_row(&mut self, handle: u32, row: &OrderRow<'_>) -> Result<(), BridgeError> {
        self.live(handle)?;
        self.calls
            .push(BridgeCall::Update(handle, row.dishes.to_vec()));
        Ok(())
    }

    fn mark_row_completed(&mut self, handle: u32) -> Result<(), BridgeError> {
        self.live(handle)?;
        self.calls.push(BridgeCall::Complete(handle));
        Ok(())
    }

    fn destroy_order_row(&mut self, handle: u32) {
        self.rows.retain(|(h, _)| *h != handle);
        self.calls.push(BridgeCall::Destroy(handle));
    }

    fn show_placeholder(&mut self, placeholder: Placeholder) {
        self.calls.push(BridgeCall::ShowPlaceholder(placeholder));
    }

    fn hide_placeholder(&mut self) {
        self.calls.push(BridgeCall::HidePlaceholder);
    }

    fn show_transient_message(&mut self, text: &str, duration: Duration) {
        self.calls
            .push(BridgeCall::Message(String::from(text), duration));
    }

    fn show_link_status(&mut self, connected: bool) {
        self.calls.push(BridgeCall::Link(connected));
    }
}

#[derive(Debug, Default)]
pub struct MockTransport {
    pub connected: bool,
    pub reject: bool,
    pub sent: Vec<Vec<u8>>,
}

impl MockTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }
}

impl BleTransport for MockTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn notify(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        if self.reject {
            return Err(TransportError::Rejected(-5));
        }
        self.sent.push(payload.to_vec());
        Ok(())
    }
}
