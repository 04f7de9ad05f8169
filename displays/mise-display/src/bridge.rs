//! Text-mode display bridge
//!
//! Keeps the widget state the engine manipulates through
//! [`DisplayBridge`]: order rows, the idle placeholder, the link indicator
//! and transient popups. [`TextBridge::refresh`] lays that state out on a
//! [`Screen`] and hands it to a [`DisplayBackend`].
//!
//! Popups expire on their own. A popup's lifetime starts on the first
//! [`TextBridge::tick`] after it was shown, so it is drawn at least once no
//! matter how long the render task slept. Each popup then keeps its own
//! deadline and is dropped exactly once, on the first tick at or past it.
//! Expiry raises no signal; the render task wakes at
//! [`TextBridge::next_deadline`] as well as on redraw requests.

use core::fmt::Write;

use embassy_time::Duration;
use heapless::{String, Vec};
use mise_core::config::DisplayConfig;
use mise_core::traits::{BridgeError, DisplayBridge, OrderRow, Placeholder};
use mise_core::MAX_ORDERS;

use crate::backend::{draw, DisplayBackend, DisplayError};
use crate::screen::{centered, push_truncated, LineStyle, Screen, LINE_BYTES, SCREEN_COLS, SCREEN_ROWS};

/// Maximum row widgets
pub const MAX_ROWS: usize = MAX_ORDERS;

/// Maximum popups alive at once; the oldest is dropped to make room
pub const MAX_POPUPS: usize = 4;

/// Bytes kept per row label
const ROW_TEXT_LEN: usize = 128;

/// Bytes kept per popup
const POPUP_TEXT_LEN: usize = 96;

const TITLE: &str = "Mise";
const LINK_UP: &str = "BT OK";
const LINK_DOWN: &str = "BT READY";
const AWAITING_LINK: &str = "等待蓝牙连接...";
const AWAITING_ORDERS: &str = "已连接";

/// Screen row of the status line
const STATUS_ROW: usize = 0;

/// Screen row popups are drawn on
const POPUP_ROW: usize = SCREEN_ROWS / 2;

/// Handle to a row widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowId(u16);

struct RowWidget {
    id: RowId,
    text: String<ROW_TEXT_LEN>,
    completed: bool,
}

struct Popup {
    text: String<POPUP_TEXT_LEN>,
    lifetime_ms: u64,
    /// Set by the first tick after the popup was shown
    expires_at_ms: Option<u64>,
}

/// Display bridge for text-mode panels
pub struct TextBridge {
    /// Row widgets, top first
    rows: Vec<RowWidget, MAX_ROWS>,
    next_id: u16,
    placeholder: Option<Placeholder>,
    connected: bool,
    /// Live popups, oldest first
    popups: Vec<Popup, MAX_POPUPS>,
    config: DisplayConfig,
    dirty: bool,
}

impl TextBridge {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
            placeholder: None,
            connected: false,
            popups: Vec::new(),
            config,
            dirty: true,
        }
    }

    /// Advance the popup clock, dropping expired popups
    ///
    /// Popups shown since the last tick get their deadline here.
    /// Returns whether the screen needs a redraw.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        for popup in self.popups.iter_mut() {
            if popup.expires_at_ms.is_none() {
                popup.expires_at_ms = Some(now_ms.saturating_add(popup.lifetime_ms));
            }
        }
        let before = self.popups.len();
        self.popups
            .retain(|p| p.expires_at_ms.is_some_and(|deadline| deadline > now_ms));
        if self.popups.len() != before {
            self.dirty = true;
        }
        self.dirty
    }

    /// Redraw to `backend` if anything changed
    ///
    /// Returns whether a frame was drawn.
    pub fn refresh<B: DisplayBackend + ?Sized>(
        &mut self,
        now_ms: u64,
        screen: &mut Screen,
        backend: &mut B,
    ) -> Result<bool, DisplayError> {
        if !self.tick(now_ms) {
            return Ok(false);
        }
        self.render(screen);
        draw(screen, backend)?;
        screen.mark_clean();
        self.dirty = false;
        Ok(true)
    }

    /// Lay out the current state on `screen`
    pub fn render(&self, screen: &mut Screen) {
        screen.clear();
        screen.set_line(STATUS_ROW, &self.status_line());

        let first = STATUS_ROW + 1;
        let visible = SCREEN_ROWS - first;
        for (i, row) in self.rows.iter().take(visible).enumerate() {
            screen.set_line(first + i, &row.text);
            if row.completed {
                screen.set_style(first + i, LineStyle::Dim);
            }
        }
        if self.rows.len() > visible {
            let last = SCREEN_ROWS - 1;
            let mut more: String<LINE_BYTES> = String::new();
            let _ = write!(more, "+{} more", self.rows.len() - visible + 1);
            screen.set_line(last, &more);
            screen.set_style(last, LineStyle::Normal);
        }

        if let Some(placeholder) = self.placeholder {
            let text = match placeholder {
                Placeholder::AwaitingLink => AWAITING_LINK,
                Placeholder::AwaitingOrders => AWAITING_ORDERS,
            };
            screen.set_line(POPUP_ROW - 1, &centered(text));
        }

        if let Some(popup) = self.popups.last() {
            screen.set_line(POPUP_ROW, &centered(&popup.text));
            screen.set_style(POPUP_ROW, LineStyle::Inverted);
        }
    }

    /// Map a touched screen row to the pending order row under it
    ///
    /// Completed rows have no ready button and map to `None`.
    pub fn row_at(&self, screen_row: usize) -> Option<RowId> {
        let index = screen_row.checked_sub(STATUS_ROW + 1)?;
        let visible = SCREEN_ROWS - (STATUS_ROW + 1);
        if self.rows.len() > visible && index == visible - 1 {
            return None;
        }
        self.rows
            .get(index)
            .filter(|row| !row.completed)
            .map(|row| row.id)
    }

    /// Row labels, top first
    pub fn row_texts(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.text.as_str())
    }

    pub fn is_row_completed(&self, id: RowId) -> Option<bool> {
        self.rows.iter().find(|row| row.id == id).map(|row| row.completed)
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        self.placeholder
    }

    /// Text of the popup currently on top
    pub fn popup(&self) -> Option<&str> {
        self.popups.last().map(|p| p.text.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Earliest popup deadline, in the clock passed to [`Self::tick`]
    ///
    /// Popups not ticked yet have no deadline; showing one marks the bridge
    /// dirty, so the next refresh stamps it.
    pub fn next_deadline(&self) -> Option<u64> {
        self.popups.iter().filter_map(|p| p.expires_at_ms).min()
    }

    fn status_line(&self) -> String<LINE_BYTES> {
        let link = if self.connected { LINK_UP } else { LINK_DOWN };
        let mut line = String::new();
        let _ = line.push_str(TITLE);
        let pad = SCREEN_COLS.saturating_sub(TITLE.len() + link.len());
        for _ in 0..pad {
            let _ = line.push(' ');
        }
        let _ = line.push_str(link);
        line
    }

    fn label(&self, row: &OrderRow<'_>) -> String<ROW_TEXT_LEN> {
        let mut text = String::new();
        let _ = write!(text, "#{} ", row.order_number);
        if row.dishes.is_empty() {
            push_truncated(&mut text, &self.config.empty_dishes_label, ROW_TEXT_LEN);
        }
        for (i, dish) in row.dishes.iter().enumerate() {
            if i > 0 {
                push_truncated(&mut text, &self.config.dish_separator, ROW_TEXT_LEN);
            }
            push_truncated(&mut text, dish, ROW_TEXT_LEN);
        }
        text
    }

    fn allocate_id(&mut self) -> RowId {
        loop {
            let id = RowId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if !self.rows.iter().any(|row| row.id == id) {
                return id;
            }
        }
    }

    fn row_mut(&mut self, id: RowId) -> Result<&mut RowWidget, BridgeError> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(BridgeError::Detached)
    }
}

impl DisplayBridge for TextBridge {
    type Handle = RowId;

    fn create_order_row(&mut self, row: &OrderRow<'_>) -> Result<RowId, BridgeError> {
        if self.rows.is_full() {
            return Err(BridgeError::OutOfResources);
        }
        let widget = RowWidget {
            id: self.allocate_id(),
            text: self.label(row),
            completed: false,
        };
        let id = widget.id;
        self.rows
            .insert(0, widget)
            .map_err(|_| BridgeError::OutOfResources)?;
        self.dirty = true;
        Ok(id)
    }

    fn update_order_row(&mut self, handle: RowId, row: &OrderRow<'_>) -> Result<(), BridgeError> {
        let text = self.label(row);
        self.row_mut(handle)?.text = text;
        self.dirty = true;
        Ok(())
    }

    fn mark_row_completed(&mut self, handle: RowId) -> Result<(), BridgeError> {
        self.row_mut(handle)?.completed = true;
        self.dirty = true;
        Ok(())
    }

    fn destroy_order_row(&mut self, handle: RowId) {
        self.rows.retain(|row| row.id != handle);
        self.dirty = true;
    }

    fn show_placeholder(&mut self, placeholder: Placeholder) {
        self.placeholder = Some(placeholder);
        self.dirty = true;
    }

    fn hide_placeholder(&mut self) {
        self.placeholder = None;
        self.dirty = true;
    }

    fn show_transient_message(&mut self, text: &str, duration: Duration) {
        if self.popups.is_full() {
            self.popups.remove(0);
        }
        let mut popup = Popup {
            text: String::new(),
            lifetime_ms: duration.as_millis(),
            expires_at_ms: None,
        };
        push_truncated(&mut popup.text, text, POPUP_TEXT_LEN);
        let _ = self.popups.push(popup);
        self.dirty = true;
    }

    fn show_link_status(&mut self, connected: bool) {
        self.connected = connected;
        self.dirty = true;
    }
}
