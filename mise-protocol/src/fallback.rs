//! Best-effort `content` recovery
//!
//! Some senders emit system messages that the JSON parser rejects: unquoted
//! keys, a missing closing brace after BLE fragmentation, or no `type` field
//! at all. This path scrapes the first quoted value following the literal
//! token `content` and nothing else. It never produces order commands and
//! gives up silently on anything odd.

use alloc::string::String;

use crate::hex_text::decode_field;

/// Token that marks a recoverable system message
const CONTENT_TOKEN: &[u8] = b"content";

/// Try to recover a system message from a payload the structured path refused
///
/// The quoted value is hex-decoded when it follows the hex convention and is
/// used as-is otherwise. Returns `None` if no complete quoted value follows
/// the token, or if the value is not valid UTF-8.
pub fn extract_content(payload: &[u8]) -> Option<String> {
    let start = find(payload, CONTENT_TOKEN)? + CONTENT_TOKEN.len();
    let rest = &payload[start..];

    // Skip the key's closing quote, separator and whitespace
    let mut pos = 0;
    if rest.first() == Some(&b'"') {
        pos += 1;
    }
    pos += skip_whitespace(&rest[pos..]);
    if matches!(rest.get(pos), Some(b':') | Some(b'=')) {
        pos += 1;
        pos += skip_whitespace(&rest[pos..]);
    }

    if rest.get(pos) != Some(&b'"') {
        return None;
    }
    let value_start = pos + 1;
    let value_len = closing_quote(&rest[value_start..])?;
    let raw = core::str::from_utf8(&rest[value_start..value_start + value_len]).ok()?;

    Some(String::from(decode_field(raw)))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn skip_whitespace(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

/// Offset of the next unescaped `"`
fn closing_quote(bytes: &[u8]) -> Option<usize> {
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\\' if !escaped => escaped = true,
            b'"' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}
