//! Display backend trait
//!
//! The panel driver behind the text screen. The BSP implements it for its
//! display controller and font.

use crate::screen::{LineStyle, Screen};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
}

/// Display backend trait
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    /// - `style`: How the whole line is drawn
    fn draw_text(&mut self, row: u8, col: u8, text: &str, style: LineStyle)
        -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}

/// Draw a screen buffer to a backend and flush it
pub fn draw<B: DisplayBackend + ?Sized>(screen: &Screen, backend: &mut B) -> Result<(), DisplayError> {
    if !backend.is_ready() {
        return Err(DisplayError::NotInitialized);
    }
    backend.clear()?;
    for (row, (text, style)) in screen.lines().enumerate() {
        if text.is_empty() && style == LineStyle::Normal {
            continue;
        }
        backend.draw_text(row as u8, 0, text, style)?;
    }
    backend.flush()
}
