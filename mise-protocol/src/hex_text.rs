//! Hex text convention
//!
//! The sending app hex-encodes text fields (dish names, system messages,
//! sometimes identifiers) so that multi-byte UTF-8 survives its own string
//! handling. A field is treated as hex when it is of even length and made only
//! of hex digits; anything else is plain text and passes through untouched.

use alloc::borrow::Cow;
use alloc::string::String;

/// Check whether a field follows the hex text convention
pub fn is_hex_text(field: &str) -> bool {
    field.len() % 2 == 0 && field.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode a hex-encoded text field
///
/// Returns `None` when the field is not hex, or when the decoded bytes are
/// not valid UTF-8.
pub fn decode_text(field: &str) -> Option<String> {
    if !is_hex_text(field) {
        return None;
    }
    let bytes = ::hex::decode(field).ok()?;
    String::from_utf8(bytes).ok()
}

/// Resolve a text field, hex-decoding it when it follows the convention
pub fn decode_field(field: &str) -> Cow<'_, str> {
    match decode_text(field) {
        Some(text) => Cow::Owned(text),
        None => Cow::Borrowed(field),
    }
}

/// Encode text the way the sending app does (lowercase hex pairs)
pub fn encode_text(text: &str) -> String {
    ::hex::encode(text)
}
