//! Inbound payload decoding
//!
//! Turns the raw bytes of one characteristic write into a [`Command`].
//! Decoding never fails: anything that cannot be understood becomes
//! [`Command::Unrecognized`].
//!
//! # Payload shapes
//!
//! ```text
//! {"type":"info","content":"<text or hex>"}
//! {"type":"order","command":"display_order","orderId":"<id>","items":[{"name":"<dish>"}]}
//! {"type":"add"|"update"|"remove","orderId":"<id>","items":[{"name":"<dish>"}]}
//! ```
//!
//! `_id` is accepted in place of `orderId`. `content` and dish names go
//! through the hex convention (see [`crate::hex_text`]). Identifiers are kept
//! exactly as sent since the acknowledgment echoes them back.
//!
//! Payloads that are not a JSON object with a `type` field are handed to the
//! best-effort path in [`crate::fallback`], which can only ever yield
//! [`Command::Info`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde_json::{Map, Value};

use crate::fallback;
use crate::hex_text::decode_field;

/// Size of the flat buffer a characteristic write is copied into
///
/// One byte is reserved for the terminator, so at most `MAX_WRITE_LEN - 1`
/// payload bytes are decoded.
pub const MAX_WRITE_LEN: usize = 512;

/// `command` value that marks an `order` payload as displayable
pub const DISPLAY_ORDER: &str = "display_order";

/// Decoded intent of one inbound write
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// System message for a transient popup
    Info(String),
    /// Open a new ticket
    AddOrder { order_id: String, dishes: Vec<String> },
    /// Replace the dish list of an open ticket
    UpdateOrder { order_id: String, dishes: Vec<String> },
    /// Take a ticket off the screen
    RemoveOrder { order_id: String },
    /// Anything else; applying it is a no-op
    Unrecognized,
}

impl Command {
    /// Order identifier this command targets, if any
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Command::AddOrder { order_id, .. }
            | Command::UpdateOrder { order_id, .. }
            | Command::RemoveOrder { order_id } => Some(order_id),
            Command::Info(_) | Command::Unrecognized => None,
        }
    }

    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Info(_) => "info",
            Command::AddOrder { .. } => "add",
            Command::UpdateOrder { .. } => "update",
            Command::RemoveOrder { .. } => "remove",
            Command::Unrecognized => "unrecognized",
        }
    }
}

/// Which decoding path produced a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodePath {
    /// Parsed as a JSON object with a `type` field
    Structured,
    /// Scraped by the `content` fallback
    BestEffort,
}

/// Decoding result with diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoded {
    pub command: Command,
    pub path: DecodePath,
    /// The payload was clipped to the write buffer or does not end with a
    /// closing brace. Only a signal: decoding still went ahead.
    pub truncated: bool,
}

/// Decode one characteristic write
pub fn decode(bytes: &[u8]) -> Command {
    decode_detailed(bytes).command
}

/// Decode one characteristic write, reporting how it was understood
pub fn decode_detailed(bytes: &[u8]) -> Decoded {
    let clipped = bytes.len() > MAX_WRITE_LEN - 1;
    let payload = terminate(&bytes[..bytes.len().min(MAX_WRITE_LEN - 1)]);
    let truncated = clipped || !payload.ends_with(b"}");

    if truncated {
        debug!("Payload not terminated ({} bytes), decoding best effort", payload.len());
    }

    if let Some(object) = parse_object(payload) {
        if object.contains_key("type") {
            let command = decode_object(&object);
            trace!("Structured payload decoded as {}", command.kind());
            return Decoded {
                command,
                path: DecodePath::Structured,
                truncated,
            };
        }
    }

    let command = match fallback::extract_content(payload) {
        Some(text) => Command::Info(text),
        None => Command::Unrecognized,
    };
    trace!("Best-effort payload decoded as {}", command.kind());

    Decoded {
        command,
        path: DecodePath::BestEffort,
        truncated,
    }
}

/// Cut at the first NUL and drop trailing whitespace
fn terminate(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let mut payload = &bytes[..end];
    while let Some((last, rest)) = payload.split_last() {
        if !last.is_ascii_whitespace() {
            break;
        }
        payload = rest;
    }
    payload
}

fn parse_object(payload: &[u8]) -> Option<Map<String, Value>> {
    let text = core::str::from_utf8(payload).ok()?;
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => None,
        Err(_) => None,
    }
}

fn decode_object(object: &Map<String, Value>) -> Command {
    let Some(kind) = string_field(object, "type") else {
        return Command::Unrecognized;
    };

    match kind.as_str() {
        "info" => match string_field(object, "content") {
            Some(text) => Command::Info(text),
            None => Command::Unrecognized,
        },
        "order" => {
            // An absent `command` is displayable; a present one must match
            if object.contains_key("command")
                && string_field(object, "command").as_deref() != Some(DISPLAY_ORDER)
            {
                return Command::Unrecognized;
            }
            match order_id(object) {
                Some(order_id) => Command::AddOrder {
                    order_id,
                    dishes: dishes(object),
                },
                None => Command::Unrecognized,
            }
        }
        "add" => match order_id(object) {
            Some(order_id) => Command::AddOrder {
                order_id,
                dishes: dishes(object),
            },
            None => Command::Unrecognized,
        },
        "update" => match order_id(object) {
            Some(order_id) => Command::UpdateOrder {
                order_id,
                dishes: dishes(object),
            },
            None => Command::Unrecognized,
        },
        "remove" => match order_id(object) {
            Some(order_id) => Command::RemoveOrder { order_id },
            None => Command::Unrecognized,
        },
        _ => Command::Unrecognized,
    }
}

/// String field, hex-decoded when it follows the convention
fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|s| String::from(decode_field(s)))
}

/// `orderId`, falling back to the legacy `_id`
///
/// Never hex-decoded. Numeric identifiers are accepted and kept in their
/// decimal form. An empty identifier is rejected.
fn order_id(object: &Map<String, Value>) -> Option<String> {
    let id = ["orderId", "_id"].iter().find_map(|key| match object.get(*key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })?;

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Dish names from `items`; entries without a string `name` are skipped
fn dishes(object: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(items)) = object.get("items") else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .map(|name| String::from(decode_field(name)))
        .collect()
}
