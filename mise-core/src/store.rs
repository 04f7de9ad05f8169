//! Order store
//!
//! Keeps the live orders most recent first, so index 0 is the top row on
//! screen. Order ids are unique. Every mutation goes through the display
//! bridge so the store and the rows on screen never disagree.

use alloc::string::String;
use alloc::vec::Vec;

use heapless::Vec as BoundedVec;

use crate::order::{Order, OrderStatus};
use crate::traits::{BridgeError, DisplayBridge, OrderRow};

/// Maximum live orders
pub const MAX_ORDERS: usize = 32;

/// Errors from store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// An order with this id is already live
    DuplicateId,
    /// No live order has this id
    NotFound,
    /// The order is completed and can no longer change
    AlreadyCompleted,
    /// The store is at capacity
    Full,
    /// The display bridge refused the change
    Bridge(BridgeError),
}

impl From<BridgeError> for StoreError {
    fn from(e: BridgeError) -> Self {
        StoreError::Bridge(e)
    }
}

/// Ordered collection of live orders
#[derive(Debug)]
pub struct OrderStore<H, const N: usize = MAX_ORDERS> {
    orders: BoundedVec<Order<H>, N>,
}

impl<H: Copy + PartialEq, const N: usize> OrderStore<H, N> {
    pub const fn new() -> Self {
        Self {
            orders: BoundedVec::new(),
        }
    }

    /// Add a new order at the top
    ///
    /// If the row widget cannot be created nothing is stored.
    pub fn insert<D>(
        &mut self,
        bridge: &mut D,
        order_id: String,
        order_number: u32,
        dishes: Vec<String>,
    ) -> Result<(), StoreError>
    where
        D: DisplayBridge<Handle = H>,
    {
        if self.position(&order_id).is_some() {
            return Err(StoreError::DuplicateId);
        }
        let order = Order {
            order_id,
            order_number,
            dishes,
            status: OrderStatus::Pending,
            ui_handle: None,
        };
        self.orders.insert(0, order).map_err(|_| StoreError::Full)?;

        let order = &self.orders[0];
        let created = bridge.create_order_row(&OrderRow {
            order_id: &order.order_id,
            order_number: order.order_number,
            dishes: &order.dishes,
        });
        match created {
            Ok(handle) => {
                self.orders[0].ui_handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.orders.remove(0);
                Err(err.into())
            }
        }
    }

    /// Replace the dishes of a pending order
    ///
    /// The display number is refreshed too. Position in the list and status
    /// are unchanged.
    pub fn update<D>(
        &mut self,
        bridge: &mut D,
        order_id: &str,
        order_number: u32,
        dishes: Vec<String>,
    ) -> Result<(), StoreError>
    where
        D: DisplayBridge<Handle = H>,
    {
        let index = self.position(order_id).ok_or(StoreError::NotFound)?;
        let order = &mut self.orders[index];
        if order.is_completed() {
            return Err(StoreError::AlreadyCompleted);
        }

        if let Some(handle) = order.ui_handle {
            bridge.update_order_row(
                handle,
                &OrderRow {
                    order_id,
                    order_number,
                    dishes: &dishes,
                },
            )?;
        }
        order.order_number = order_number;
        order.dishes = dishes;
        Ok(())
    }

    /// Remove an order and destroy its row
    ///
    /// Works for pending and completed orders alike. The entry leaves the
    /// store before the widget is destroyed, so no entry ever points at a
    /// dead widget.
    pub fn remove<D>(&mut self, bridge: &mut D, order_id: &str) -> Result<Order<H>, StoreError>
    where
        D: DisplayBridge<Handle = H>,
    {
        let index = self.position(order_id).ok_or(StoreError::NotFound)?;
        let mut order = self.orders.remove(index);
        if let Some(handle) = order.ui_handle.take() {
            bridge.destroy_order_row(handle);
        }
        Ok(order)
    }

    /// Move a pending order to completed and grey out its row
    pub fn mark_completed<D>(&mut self, bridge: &mut D, order_id: &str) -> Result<(), StoreError>
    where
        D: DisplayBridge<Handle = H>,
    {
        let index = self.position(order_id).ok_or(StoreError::NotFound)?;
        let order = &mut self.orders[index];
        if order.is_completed() {
            return Err(StoreError::AlreadyCompleted);
        }

        if let Some(handle) = order.ui_handle {
            bridge.mark_row_completed(handle)?;
        }
        order.status = OrderStatus::Completed;
        Ok(())
    }

    pub fn find(&self, order_id: &str) -> Option<&Order<H>> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    /// Find the order shown by a row widget
    pub fn find_by_handle(&self, handle: H) -> Option<&Order<H>> {
        self.orders.iter().find(|o| o.ui_handle == Some(handle))
    }

    /// Orders, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Order<H>> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    fn position(&self, order_id: &str) -> Option<usize> {
        self.orders.iter().position(|o| o.order_id == order_id)
    }
}

impl<H: Copy + PartialEq, const N: usize> Default for OrderStore<H, N> {
    fn default() -> Self {
        Self::new()
    }
}
