//! Lifecycle controller
//!
//! Owns the order store, the display bridge and the notifier. Inbound
//! commands come from the BLE write path, the ready action from the
//! operator tapping a row. Both run with the display lock held.

use alloc::string::String;
use alloc::vec::Vec;

use mise_protocol::Command;

use super::outcome::{Delivery, Effect, Outcome};
use crate::config::PopupConfig;
use crate::notifier::Notifier;
use crate::order::order_number;
use crate::store::{OrderStore, StoreError, MAX_ORDERS};
use crate::traits::{BleTransport, DisplayBridge, Placeholder};

/// The kitchen display's order engine
pub struct Kitchen<D: DisplayBridge, T, const N: usize = MAX_ORDERS> {
    store: OrderStore<D::Handle, N>,
    bridge: D,
    notifier: Notifier<T>,
    popups: PopupConfig,
    connected: bool,
}

impl<D: DisplayBridge, T: BleTransport, const N: usize> Kitchen<D, T, N> {
    /// Create the engine and draw the idle screen
    pub fn new(mut bridge: D, transport: T, popups: PopupConfig) -> Self {
        let connected = transport.is_connected();
        bridge.show_link_status(connected);
        bridge.show_placeholder(idle_placeholder(connected));

        Self {
            store: OrderStore::new(),
            bridge,
            notifier: Notifier::new(transport),
            popups,
            connected,
        }
    }

    /// Apply one decoded write
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Info(text) => {
                debug!("info: {}", text.as_str());
                self.bridge
                    .show_transient_message(&text, self.popups.info_duration());
                Outcome::Applied(Effect::MessageShown)
            }
            Command::AddOrder { order_id, dishes } => self.add(order_id, dishes),
            Command::UpdateOrder { order_id, dishes } => self.update(&order_id, dishes),
            Command::RemoveOrder { order_id } => self.remove(&order_id),
            Command::Unrecognized => {
                trace!("unrecognized write ignored");
                Outcome::Ignored
            }
        }
    }

    fn add(&mut self, order_id: String, dishes: Vec<String>) -> Outcome {
        let number = order_number(&order_id);
        let was_empty = self.store.is_empty();
        info!("add {} as #{} ({} dishes)", order_id.as_str(), number, dishes.len());

        if let Err(e) = self.store.insert(&mut self.bridge, order_id, number, dishes) {
            warn!("add dropped: {:?}", e);
            return Outcome::Dropped(e.into());
        }
        if was_empty {
            self.bridge.hide_placeholder();
        }
        self.confirm(Effect::Added)
    }

    fn update(&mut self, order_id: &str, dishes: Vec<String>) -> Outcome {
        let number = order_number(order_id);
        info!("update {} ({} dishes)", order_id, dishes.len());

        if let Err(e) = self.store.update(&mut self.bridge, order_id, number, dishes) {
            warn!("update of {} dropped: {:?}", order_id, e);
            return Outcome::Dropped(e.into());
        }
        self.confirm(Effect::Updated)
    }

    fn remove(&mut self, order_id: &str) -> Outcome {
        info!("remove {}", order_id);

        if let Err(e) = self.store.remove(&mut self.bridge, order_id) {
            debug!("remove of {} dropped: {:?}", order_id, e);
            return Outcome::Dropped(e.into());
        }
        if self.store.is_empty() {
            self.bridge.show_placeholder(idle_placeholder(self.connected));
        }
        self.confirm(Effect::Removed)
    }

    fn confirm(&mut self, effect: Effect) -> Outcome {
        if self.popups.lifecycle {
            let text = match effect {
                Effect::Added => Some(&self.popups.added_message),
                Effect::Updated => Some(&self.popups.updated_message),
                Effect::Removed => Some(&self.popups.removed_message),
                Effect::MessageShown => None,
            };
            if let Some(text) = text {
                self.bridge
                    .show_transient_message(text, self.popups.lifecycle_duration());
            }
        }
        Outcome::Applied(effect)
    }

    /// Operator marked an order ready
    ///
    /// Completes the order, greys out its row and sends the acknowledgment.
    /// A failed acknowledgment does not undo the completion.
    pub fn mark_ready(&mut self, order_id: &str) -> Result<Delivery, StoreError> {
        if let Err(e) = self.store.mark_completed(&mut self.bridge, order_id) {
            debug!("ready for {} refused: {:?}", order_id, e);
            return Err(e);
        }
        info!("order {} ready", order_id);

        match self.notifier.notify_complete(order_id) {
            Ok(()) => Ok(Delivery::Sent),
            Err(e) => {
                warn!("ack for {} not sent: {:?}", order_id, e);
                Ok(Delivery::NotSent(e))
            }
        }
    }

    /// Operator tapped the ready button on a row
    pub fn mark_ready_row(&mut self, handle: D::Handle) -> Result<Delivery, StoreError> {
        let order_id = self
            .store
            .find_by_handle(handle)
            .map(|o| String::from(o.order_id()))
            .ok_or(StoreError::NotFound)?;
        self.mark_ready(&order_id)
    }

    /// BLE connection state changed
    ///
    /// Returns whether anything on screen changed; a repeated state is a
    /// no-op.
    pub fn link_changed(&mut self, connected: bool) -> bool {
        if connected == self.connected {
            return false;
        }
        info!("link {}", if connected { "up" } else { "down" });
        self.connected = connected;
        self.bridge.show_link_status(connected);
        if self.store.is_empty() {
            self.bridge.show_placeholder(idle_placeholder(connected));
        }
        true
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn store(&self) -> &OrderStore<D::Handle, N> {
        &self.store
    }

    pub fn bridge(&self) -> &D {
        &self.bridge
    }

    /// Bridge access for the render task
    pub fn bridge_mut(&mut self) -> &mut D {
        &mut self.bridge
    }

    pub fn notifier(&self) -> &Notifier<T> {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier<T> {
        &mut self.notifier
    }
}

fn idle_placeholder(connected: bool) -> Placeholder {
    if connected {
        Placeholder::AwaitingOrders
    } else {
        Placeholder::AwaitingLink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::DropReason;
    use crate::notifier::NotifyError;
    use crate::testing::{dishes, BridgeCall, MockBridge, MockTransport};
    use crate::traits::BridgeError;
    use embassy_time::Duration;

    type TestKitchen = Kitchen<MockBridge, MockTransport>;

    fn kitchen() -> TestKitchen {
        let mut kitchen = Kitchen::new(
            MockBridge::new(),
            MockTransport::connected(),
            PopupConfig::default(),
        );
        kitchen.bridge_mut().clear_calls();
        kitchen
    }

    fn add(id: &str, names: &[&str]) -> Command {
        Command::AddOrder {
            order_id: id.into(),
            dishes: dishes(names),
        }
    }

    fn remove(id: &str) -> Command {
        Command::RemoveOrder {
            order_id: id.into(),
        }
    }

    #[test]
    fn test_new_draws_idle_screen() {
        let kitchen: TestKitchen =
            Kitchen::new(MockBridge::new(), MockTransport::default(), PopupConfig::default());

        assert_eq!(
            kitchen.bridge().calls(),
            [
                BridgeCall::Link(false),
                BridgeCall::ShowPlaceholder(Placeholder::AwaitingLink)
            ]
        );
        assert!(!kitchen.is_connected());
    }

    #[test]
    fn test_info_shows_popup() {
        let mut kitchen = kitchen();

        let outcome = kitchen.apply(Command::Info("Hello".into()));

        assert_eq!(outcome, Outcome::Applied(Effect::MessageShown));
        assert_eq!(
            kitchen.bridge().calls(),
            [BridgeCall::Message("Hello".into(), Duration::from_millis(3000))]
        );
        assert!(kitchen.store().is_empty());
    }

    #[test]
    fn test_first_add_hides_placeholder() {
        let mut kitchen = kitchen();

        let outcome = kitchen.apply(add("order_1234", &["Ramen", "Gyoza"]));

        assert_eq!(outcome, Outcome::Applied(Effect::Added));
        let order = kitchen.store().find("order_1234").unwrap();
        assert_eq!(order.order_number(), 1234);
        assert_eq!(order.dishes(), ["Ramen", "Gyoza"]);
        assert_eq!(
            kitchen.bridge().calls(),
            [
                BridgeCall::Create(100, "order_1234".into()),
                BridgeCall::HidePlaceholder,
                BridgeCall::Message("订单已添加".into(), Duration::from_millis(2000)),
            ]
        );

        kitchen.bridge_mut().clear_calls();
        kitchen.apply(add("o2", &[]));
        assert!(!kitchen
            .bridge()
            .calls()
            .contains(&BridgeCall::HidePlaceholder));
    }

    #[test]
    fn test_duplicate_add_dropped() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o1", &["A"]));
        kitchen.bridge_mut().clear_calls();

        let outcome = kitchen.apply(add("o1", &["B"]));

        assert_eq!(outcome, Outcome::Dropped(DropReason::Store(StoreError::DuplicateId)));
        assert!(kitchen.bridge().calls().is_empty());
        assert_eq!(kitchen.store().find("o1").unwrap().dishes(), ["A"]);
    }

    #[test]
    fn test_add_bridge_failure() {
        let mut kitchen = kitchen();
        kitchen.bridge_mut().fail_next_create();

        let outcome = kitchen.apply(add("o1", &["A"]));

        assert_eq!(
            outcome,
            Outcome::Dropped(DropReason::Store(StoreError::Bridge(
                BridgeError::OutOfResources
            )))
        );
        assert!(kitchen.store().is_empty());
        assert!(kitchen.bridge().calls().is_empty());
    }

    #[test]
    fn test_update_and_unknown_update() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o1", &["A"]));

        let outcome = kitchen.apply(Command::UpdateOrder {
            order_id: "o1".into(),
            dishes: dishes(&["B", "C"]),
        });
        assert_eq!(outcome, Outcome::Applied(Effect::Updated));
        assert_eq!(kitchen.store().find("o1").unwrap().dishes(), ["B", "C"]);
        assert_eq!(kitchen.bridge().messages().last(), Some(&"订单已更新"));

        let outcome = kitchen.apply(Command::UpdateOrder {
            order_id: "ghost".into(),
            dishes: dishes(&["X"]),
        });
        assert_eq!(outcome, Outcome::Dropped(DropReason::Store(StoreError::NotFound)));
        assert_eq!(kitchen.store().len(), 1);
    }

    #[test]
    fn test_last_remove_shows_placeholder() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o1", &[]));
        kitchen.apply(add("o2", &[]));
        kitchen.bridge_mut().clear_calls();

        assert_eq!(kitchen.apply(remove("o1")), Outcome::Applied(Effect::Removed));
        assert!(!kitchen
            .bridge()
            .calls()
            .iter()
            .any(|c| matches!(c, BridgeCall::ShowPlaceholder(_))));

        kitchen.apply(remove("o2"));
        assert!(kitchen
            .bridge()
            .calls()
            .contains(&BridgeCall::ShowPlaceholder(Placeholder::AwaitingOrders)));
        assert_eq!(kitchen.bridge().messages(), ["订单已删除", "订单已删除"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o1", &[]));
        kitchen.apply(remove("o1"));
        kitchen.bridge_mut().clear_calls();

        let outcome = kitchen.apply(remove("o1"));

        assert_eq!(outcome, Outcome::Dropped(DropReason::Store(StoreError::NotFound)));
        assert!(kitchen.bridge().calls().is_empty());
    }

    #[test]
    fn test_lifecycle_popups_disabled() {
        let popups = PopupConfig {
            lifecycle: false,
            ..Default::default()
        };
        let mut kitchen: TestKitchen =
            Kitchen::new(MockBridge::new(), MockTransport::connected(), popups);

        kitchen.apply(add("o1", &[]));
        kitchen.apply(remove("o1"));
        kitchen.apply(Command::Info("still shown".into()));

        assert_eq!(kitchen.bridge().messages(), ["still shown"]);
    }

    #[test]
    fn test_unrecognized_ignored() {
        let mut kitchen = kitchen();

        assert_eq!(kitchen.apply(Command::Unrecognized), Outcome::Ignored);
        assert!(kitchen.bridge().calls().is_empty());
    }

    #[test]
    fn test_mark_ready_notifies_once() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o3", &["Tea"]));

        assert_eq!(kitchen.mark_ready("o3"), Ok(Delivery::Sent));
        assert_eq!(
            kitchen.mark_ready("o3"),
            Err(StoreError::AlreadyCompleted)
        );

        assert!(kitchen.store().find("o3").unwrap().is_completed());
        assert_eq!(
            kitchen.notifier().transport().sent,
            [br#"{"orderId":"o3","status":true}"#.to_vec()]
        );
        assert_eq!(kitchen.bridge().completed(), 1);
    }

    #[test]
    fn test_mark_ready_unknown() {
        let mut kitchen = kitchen();

        assert_eq!(kitchen.mark_ready("ghost"), Err(StoreError::NotFound));
        assert!(kitchen.notifier().transport().sent.is_empty());
    }

    #[test]
    fn test_mark_ready_while_disconnected() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o3", &[]));
        kitchen.notifier_mut().transport_mut().connected = false;

        assert_eq!(
            kitchen.mark_ready("o3"),
            Ok(Delivery::NotSent(NotifyError::NotConnected))
        );
        // Completion sticks even though nobody heard about it
        assert!(kitchen.store().find("o3").unwrap().is_completed());
        assert_eq!(kitchen.mark_ready("o3"), Err(StoreError::AlreadyCompleted));
    }

    #[test]
    fn test_mark_ready_row() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o1", &[]));
        kitchen.apply(add("o2", &[]));
        let handle = kitchen.store().find("o1").unwrap().ui_handle().unwrap();

        assert_eq!(kitchen.mark_ready_row(handle), Ok(Delivery::Sent));
        assert!(kitchen.store().find("o1").unwrap().is_completed());
        assert!(!kitchen.store().find("o2").unwrap().is_completed());
        assert_eq!(kitchen.mark_ready_row(12345), Err(StoreError::NotFound));
    }

    #[test]
    fn test_completed_order_can_be_removed() {
        let mut kitchen = kitchen();
        kitchen.apply(add("o1", &[]));
        kitchen.mark_ready("o1").unwrap();

        assert_eq!(kitchen.apply(remove("o1")), Outcome::Applied(Effect::Removed));
        assert!(kitchen.store().is_empty());
    }

    #[test]
    fn test_link_changes() {
        let mut kitchen: TestKitchen =
            Kitchen::new(MockBridge::new(), MockTransport::default(), PopupConfig::default());
        kitchen.bridge_mut().clear_calls();

        assert!(kitchen.link_changed(true));
        assert_eq!(
            kitchen.bridge().calls(),
            [
                BridgeCall::Link(true),
                BridgeCall::ShowPlaceholder(Placeholder::AwaitingOrders)
            ]
        );

        // Repeated state is a no-op
        kitchen.bridge_mut().clear_calls();
        assert!(!kitchen.link_changed(true));
        assert!(kitchen.bridge().calls().is_empty());

        // With orders on screen only the indicator changes
        kitchen.apply(add("o1", &[]));
        kitchen.bridge_mut().clear_calls();
        assert!(kitchen.link_changed(false));
        assert_eq!(kitchen.bridge().calls(), [BridgeCall::Link(false)]);
        assert_eq!(kitchen.store().len(), 1);
    }
}
