//! Startup payload decoding.
//!
//! # Design Decisions
//! - Keys match field names case-insensitively (ASCII folding)
//! - A repeated key keeps the last value, including across case variants
//! - A `null` value leaves the field at its zero value or earlier setting

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::schema::StartupArgs;

/// Payload used when the host passes nothing.
pub const EMPTY_PAYLOAD: &str = "{}";

/// The startup payload is not well-formed.
#[derive(Debug, Error)]
#[error("invalid startup payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Decode the host payload into [`StartupArgs`].
///
/// Absent, blank, and `null` payloads all decode to the zero-value arguments.
/// Unknown fields are ignored; there is no field-by-field fallback.
pub fn decode_payload(payload: Option<&str>) -> Result<StartupArgs, DecodeError> {
    let raw = match payload {
        Some(p) if !p.trim().is_empty() => p,
        _ => EMPTY_PAYLOAD,
    };

    let Some(FoldedObject(fields)) = serde_json::from_str::<Option<FoldedObject>>(raw)? else {
        return Ok(StartupArgs::default());
    };
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// A JSON object whose known keys are rewritten to their canonical spelling,
/// in document order, so later entries overwrite earlier ones.
struct FoldedObject(Map<String, Value>);

impl<'de> Deserialize<'de> for FoldedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FoldedObjectVisitor)
    }
}

struct FoldedObjectVisitor;

impl<'de> Visitor<'de> for FoldedObjectVisitor {
    type Value = FoldedObject;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut fields = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            if value.is_null() {
                continue;
            }
            fields.insert(canonical_key(key), value);
        }
        Ok(FoldedObject(fields))
    }
}

fn canonical_key(key: String) -> String {
    StartupArgs::FIELD_NAMES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&key))
        .map(|name| name.to_string())
        .unwrap_or(key)
}
