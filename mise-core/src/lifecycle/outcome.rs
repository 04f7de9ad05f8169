//! Results of lifecycle operations

use crate::notifier::NotifyError;
use crate::shared::Busy;
use crate::store::StoreError;

/// What happened to an inbound command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The command took effect
    Applied(Effect),
    /// The command was valid but could not be applied
    Dropped(DropReason),
    /// Not a command this display understands
    Ignored,
}

/// Visible effect of an applied command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    MessageShown,
    Added,
    Updated,
    Removed,
}

/// Why a command was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    Store(StoreError),
    /// The display lock was already held by this context
    Busy,
}

impl From<StoreError> for DropReason {
    fn from(e: StoreError) -> Self {
        DropReason::Store(e)
    }
}

impl From<Busy> for DropReason {
    fn from(_: Busy) -> Self {
        DropReason::Busy
    }
}

/// Whether the completion acknowledgment reached the transport
///
/// The order is completed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    Sent,
    NotSent(NotifyError),
}

/// Errors from marking an order ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadyError {
    Store(StoreError),
    Busy,
}

impl From<StoreError> for ReadyError {
    fn from(e: StoreError) -> Self {
        ReadyError::Store(e)
    }
}

impl From<Busy> for ReadyError {
    fn from(_: Busy) -> Self {
        ReadyError::Busy
    }
}
