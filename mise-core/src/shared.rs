//! Shared access under the display lock
//!
//! The BLE write callback, the touch handler and the render task all run in
//! different contexts. Every one of them goes through [`SharedKitchen`],
//! which holds the engine behind the display lock. Decoding happens before
//! the lock is taken; only store and bridge work happens inside it.
//!
//! The BSP supplies the raw mutex. On boards where the widget toolkit has
//! its own lock, that lock is wrapped as a [`RawMutex`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use mise_protocol::{decode_detailed, READ_RESPONSE};

use crate::lifecycle::{Delivery, DropReason, Kitchen, Outcome, ReadyError};
use crate::store::MAX_ORDERS;
use crate::traits::{BleTransport, DisplayBridge};

/// The engine is already borrowed by the calling context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Busy;

/// Engine shared between the BLE, touch and render contexts
pub struct SharedKitchen<M: RawMutex, D: DisplayBridge, T, const N: usize = MAX_ORDERS> {
    kitchen: Mutex<M, RefCell<Kitchen<D, T, N>>>,
    redraw: Signal<M, ()>,
}

impl<M: RawMutex, D: DisplayBridge, T: BleTransport, const N: usize> SharedKitchen<M, D, T, N> {
    pub fn new(kitchen: Kitchen<D, T, N>) -> Self {
        Self {
            kitchen: Mutex::new(RefCell::new(kitchen)),
            redraw: Signal::new(),
        }
    }

    /// Run `f` with exclusive access to the engine
    ///
    /// Returns [`Busy`] instead of deadlocking when called from inside
    /// another `lock` on the same context.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Kitchen<D, T, N>) -> R) -> Result<R, Busy> {
        self.kitchen.lock(|cell| {
            let mut kitchen = cell.try_borrow_mut().map_err(|_| Busy)?;
            Ok(f(&mut kitchen))
        })
    }

    /// Handle a write to the order characteristic
    pub fn handle_write(&self, bytes: &[u8]) -> Outcome {
        let decoded = decode_detailed(bytes);
        if decoded.truncated {
            warn!("write of {} bytes looks truncated", bytes.len());
        }
        trace!("decoded {} write", decoded.command.kind());

        let outcome = match self.lock(|kitchen| kitchen.apply(decoded.command)) {
            Ok(outcome) => outcome,
            Err(Busy) => {
                error!("display lock re-entered, write dropped");
                Outcome::Dropped(DropReason::Busy)
            }
        };
        if let Outcome::Applied(_) = outcome {
            self.redraw.signal(());
        }
        outcome
    }

    /// Handle a read of the order characteristic
    pub fn handle_read(&self) -> &'static [u8] {
        READ_RESPONSE
    }

    /// Operator marked an order ready by id
    pub fn mark_ready(&self, order_id: &str) -> Result<Delivery, ReadyError> {
        let delivery = self.lock(|kitchen| kitchen.mark_ready(order_id))??;
        self.redraw.signal(());
        Ok(delivery)
    }

    /// Operator tapped the ready button on a row
    pub fn mark_ready_row(&self, handle: D::Handle) -> Result<Delivery, ReadyError> {
        let delivery = self.lock(|kitchen| kitchen.mark_ready_row(handle))??;
        self.redraw.signal(());
        Ok(delivery)
    }

    /// BLE connection state changed
    pub fn link_changed(&self, connected: bool) -> Result<(), Busy> {
        if self.lock(|kitchen| kitchen.link_changed(connected))? {
            self.redraw.signal(());
        }
        Ok(())
    }

    /// Wait until something on screen changed
    pub async fn wait_redraw(&self) {
        self.redraw.wait().await
    }

    /// Whether a redraw is pending, clearing the request
    pub fn take_redraw(&self) -> bool {
        self.redraw.try_take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PopupConfig;
    use crate::lifecycle::Effect;
    use crate::store::StoreError;
    use crate::testing::{MockBridge, MockTransport};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::sync::Arc;
    use std::thread;

    type TestShared = SharedKitchen<CriticalSectionRawMutex, MockBridge, MockTransport>;

    fn shared() -> TestShared {
        SharedKitchen::new(Kitchen::new(
            MockBridge::new(),
            MockTransport::connected(),
            PopupConfig::default(),
        ))
    }

    #[test]
    fn test_write_then_ready() {
        let shared = shared();

        let outcome = shared.handle_write(
            br#"{"type":"order","command":"display_order","orderId":"o1","items":[{"name":"Ramen"}]}"#,
        );
        assert_eq!(outcome, Outcome::Applied(Effect::Added));
        assert!(shared.take_redraw());
        assert!(!shared.take_redraw());

        assert_eq!(shared.mark_ready("o1"), Ok(Delivery::Sent));
        assert!(shared.take_redraw());
        assert_eq!(
            shared.mark_ready("o1"),
            Err(ReadyError::Store(StoreError::AlreadyCompleted))
        );
        assert!(!shared.take_redraw());
    }

    #[test]
    fn test_ignored_write_does_not_redraw() {
        let shared = shared();

        assert_eq!(shared.handle_write(b"garbage"), Outcome::Ignored);
        assert!(!shared.take_redraw());
    }

    #[test]
    fn test_repeated_link_state_does_not_redraw() {
        let shared = shared();

        assert_eq!(shared.link_changed(true), Ok(()));
        assert!(!shared.take_redraw());

        assert_eq!(shared.link_changed(false), Ok(()));
        assert!(shared.take_redraw());
        assert_eq!(shared.link_changed(false), Ok(()));
        assert!(!shared.take_redraw());
    }

    #[test]
    fn test_read_response() {
        assert_eq!(shared().handle_read(), b"OK");
    }

    #[test]
    fn test_reentrant_access_is_refused() {
        let shared = shared();

        let inner = shared
            .lock(|_| shared.handle_write(br#"{"type":"info","content":"Hi"}"#))
            .unwrap();

        assert_eq!(inner, Outcome::Dropped(DropReason::Busy));
        assert_eq!(
            shared.lock(|_| shared.mark_ready("o1")).unwrap(),
            Err(ReadyError::Busy)
        );
        assert_eq!(shared.lock(|_| shared.link_changed(false)).unwrap(), Err(Busy));
    }

    #[test]
    fn test_concurrent_writers() {
        let shared = Arc::new(shared());

        let workers: Vec<_> = (0..4)
            .map(|w| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for i in 0..8 {
                        let payload = format!(r#"{{"type":"add","orderId":"w{}-{}"}}"#, w, i);
                        assert_eq!(
                            shared.handle_write(payload.as_bytes()),
                            Outcome::Applied(Effect::Added)
                        );
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        shared
            .lock(|kitchen| {
                let store = kitchen.store();
                assert_eq!(store.len(), 32);
                assert_eq!(kitchen.bridge().rows().len(), 32);

                let ids: Vec<&str> = store.iter().map(|o| o.order_id()).collect();
                for w in 0..4 {
                    // Each writer's orders keep their relative order, newest on top
                    let mine: Vec<&str> = ids
                        .iter()
                        .copied()
                        .filter(|id| id.starts_with(&format!("w{}-", w)))
                        .collect();
                    let expected: Vec<String> =
                        (0..8).rev().map(|i| format!("w{}-{}", w, i)).collect();
                    assert_eq!(mine, expected);
                }
            })
            .unwrap();
    }
}
