//! Screen buffer types
//!
//! Provides a character-based screen buffer for text-mode panels. Widths
//! are counted in characters, so CJK text is never split mid-character.

use heapless::String;

/// Number of character rows
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns
pub const SCREEN_COLS: usize = 21;

/// Bytes reserved per line (up to four bytes per UTF-8 character)
pub const LINE_BYTES: usize = SCREEN_COLS * 4;

/// How a line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineStyle {
    #[default]
    Normal,
    /// Greyed out (completed orders)
    Dim,
    /// Light on dark (popups)
    Inverted,
}

/// Screen buffer for text-mode panels
#[derive(Clone)]
pub struct Screen {
    lines: [String<LINE_BYTES>; SCREEN_ROWS],
    styles: [LineStyle; SCREEN_ROWS],
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            styles: [LineStyle::Normal; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.styles = [LineStyle::Normal; SCREEN_ROWS];
        self.dirty = true;
    }

    /// Set the content of a row, truncated to the screen width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            push_truncated(line, text, SCREEN_COLS);
            self.dirty = true;
        }
    }

    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn set_style(&mut self, row: usize, style: LineStyle) {
        if let Some(slot) = self.styles.get_mut(row) {
            *slot = style;
            self.dirty = true;
        }
    }

    pub fn get_style(&self, row: usize) -> Option<LineStyle> {
        self.styles.get(row).copied()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Lines with their styles, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = (&str, LineStyle)> {
        self.lines
            .iter()
            .zip(self.styles.iter())
            .map(|(line, style)| (line.as_str(), *style))
    }
}

/// Append up to `max_chars` characters of `text`, stopping early if `out`
/// runs out of room
pub fn push_truncated<const N: usize>(out: &mut String<N>, text: &str, max_chars: usize) {
    for ch in text.chars().take(max_chars) {
        if out.push(ch).is_err() {
            break;
        }
    }
}

/// Center `text` within the screen width
pub fn centered(text: &str) -> String<LINE_BYTES> {
    let mut line = String::new();
    let len = text.chars().count();
    let pad = SCREEN_COLS.saturating_sub(len) / 2;
    for _ in 0..pad {
        let _ = line.push(' ');
    }
    push_truncated(&mut line, text, SCREEN_COLS - pad);
    line
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (row, (text, style)) in self.lines().enumerate() {
            if row > 0 {
                defmt::write!(f, " | ");
            }
            match style {
                LineStyle::Normal => defmt::write!(f, "{}", text),
                other => defmt::write!(f, "{}({})", text, other),
            }
        }
        defmt::write!(f, "]");
    }
}
