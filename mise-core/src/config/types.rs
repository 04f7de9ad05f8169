//! Configuration type definitions

use embassy_time::Duration;
use heapless::String;
use serde::Deserialize;

/// Maximum length of a popup message, in bytes
pub const MAX_MESSAGE_LEN: usize = 48;

/// Maximum length of a rendering label, in bytes
pub const MAX_LABEL_LEN: usize = 16;

/// Longest accepted popup duration
pub const MAX_POPUP_MS: u32 = 60_000;

/// Complete kitchen display configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default, deny_unknown_fields)]
pub struct KitchenConfig {
    pub popups: PopupConfig,
    pub display: DisplayConfig,
}

/// Popup timing and texts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default, deny_unknown_fields)]
pub struct PopupConfig {
    /// How long a system message stays up (ms)
    pub info_ms: u32,
    /// How long an add/update/remove confirmation stays up (ms)
    pub lifecycle_ms: u32,
    /// Show confirmations for add/update/remove at all
    pub lifecycle: bool,
    pub added_message: String<MAX_MESSAGE_LEN>,
    pub updated_message: String<MAX_MESSAGE_LEN>,
    pub removed_message: String<MAX_MESSAGE_LEN>,
}

impl PopupConfig {
    pub fn info_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.info_ms))
    }

    pub fn lifecycle_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.lifecycle_ms))
    }
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            info_ms: 3000,
            lifecycle_ms: 2000,
            lifecycle: true,
            added_message: text("订单已添加"),
            updated_message: text("订单已更新"),
            removed_message: text("订单已删除"),
        }
    }
}

/// How order rows are rendered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Shown instead of the dish list when an order has no dishes
    pub empty_dishes_label: String<MAX_LABEL_LEN>,
    /// Placed between dish names
    pub dish_separator: String<MAX_LABEL_LEN>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            empty_dishes_label: text("无菜品"),
            dish_separator: text("、"),
        }
    }
}

fn text<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}
