//! Enum codec: two-sided lookup between symbolic keys and raw codes.
//!
//! A raw value that matches neither a key nor a code casts to `Null`, the
//! same as an absent value. The miss is logged so unmapped payload data can
//! be traced.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::{number_to_decimal, AttrValue, Codec, CodecKind};
use crate::errors::{ViewError, ViewResult};

/// Ordered symbol-to-raw mapping; keys and values are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMapping {
    entries: IndexMap<String, Value>,
}

impl EnumMapping {
    pub fn new<K, I>(entries: I) -> ViewResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut map: IndexMap<String, Value> = IndexMap::new();
        for (key, raw) in entries {
            let key = key.into();
            if map.values().any(|existing| same_code(existing, &raw)) {
                return Err(ViewError::InvalidEnumMapping(format!(
                    "raw value {} mapped twice",
                    raw
                )));
            }
            if map.insert(key.clone(), raw).is_some() {
                return Err(ViewError::InvalidEnumMapping(format!(
                    "key '{}' mapped twice",
                    key
                )));
            }
        }
        if map.is_empty() {
            return Err(ViewError::InvalidEnumMapping("mapping is empty".into()));
        }
        Ok(Self { entries: map })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the key mapped to a raw code
    pub fn key_of(&self, raw: &Value) -> Option<&str> {
        self.entry_of(raw).map(|(k, _)| k)
    }

    pub fn contains_raw(&self, raw: &Value) -> bool {
        self.entry_of(raw).is_some()
    }

    /// Key and canonical code for a raw value
    fn entry_of(&self, raw: &Value) -> Option<(&str, &Value)> {
        self.entries
            .iter()
            .find(|(_, v)| same_code(v, raw))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Numeric codes match by value, so `1.0` finds the code `1`.
fn same_code(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            match (number_to_decimal(x), number_to_decimal(y)) {
                (Some(x), Some(y)) => x == y,
                _ => x == y,
            }
        }
        _ => a == b,
    }
}

/// String form used when matching a value against the mapping's keys
fn key_text(value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::String(s) | AttrValue::Symbol(s) | AttrValue::Raw(Value::String(s)) => {
            Some(s.clone())
        }
        AttrValue::Int(i) => Some(i.to_string()),
        AttrValue::Bool(b) | AttrValue::Raw(Value::Bool(b)) => Some(b.to_string()),
        AttrValue::Raw(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct EnumCodec {
    mapping: EnumMapping,
}

impl EnumCodec {
    pub fn new(mapping: EnumMapping) -> Self {
        Self { mapping }
    }

    fn symbol_for(&self, value: &AttrValue) -> Option<String> {
        if let Some(text) = key_text(value) {
            if self.mapping.get(&text).is_some() {
                return Some(text);
            }
        }
        self.mapping.key_of(&value.to_json()).map(str::to_string)
    }
}

impl Codec for EnumCodec {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Enum
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        if value.is_null() {
            return Ok(AttrValue::Null);
        }
        match self.symbol_for(value) {
            Some(key) => Ok(AttrValue::Symbol(key)),
            None => {
                debug!(event = "ENUM_VALUE_UNMAPPED", value = ?value);
                Ok(AttrValue::Null)
            }
        }
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let Some((_, code)) = self.mapping.entry_of(&value.to_json()) {
            return Ok(code.clone());
        }
        match key_text(value).and_then(|key| self.mapping.get(&key).cloned()) {
            Some(code) => Ok(code),
            None => {
                debug!(event = "ENUM_VALUE_UNMAPPED", value = ?value);
                Ok(Value::Null)
            }
        }
    }

    fn enum_mapping(&self) -> Option<&EnumMapping> {
        Some(&self.mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn colors() -> EnumCodec {
        EnumCodec::new(
            EnumMapping::new([("red", json!(0)), ("green", json!(1)), ("blue", json!(2))]).unwrap(),
        )
    }

    #[test]
    fn casts_raw_codes_to_symbols() {
        let codec = colors();
        assert_eq!(
            codec.cast(&AttrValue::from_raw(json!(1))).unwrap(),
            AttrValue::symbol("green")
        );
        assert_eq!(codec.cast(&AttrValue::Int(2)).unwrap(), AttrValue::symbol("blue"));
    }

    #[test]
    fn casts_keys_to_symbols() {
        let codec = colors();
        assert_eq!(
            codec.cast(&AttrValue::from("red")).unwrap(),
            AttrValue::symbol("red")
        );
    }

    #[test]
    fn unmapped_casts_to_null() {
        let codec = colors();
        assert_eq!(codec.cast(&AttrValue::from_raw(json!(9))).unwrap(), AttrValue::Null);
        assert_eq!(codec.cast(&AttrValue::from("purple")).unwrap(), AttrValue::Null);
    }

    #[test]
    fn serialize_accepts_key_or_code() {
        let codec = colors();
        assert_eq!(codec.serialize(&AttrValue::symbol("green")).unwrap(), json!(1));
        assert_eq!(codec.serialize(&AttrValue::Int(1)).unwrap(), json!(1));
        assert_eq!(codec.serialize(&AttrValue::Null).unwrap(), Value::Null);
    }

    #[test]
    fn numeric_codes_match_by_value() {
        let codec = colors();
        let fractional = AttrValue::from_raw(json!(1.0));
        assert_eq!(codec.cast(&fractional).unwrap(), AttrValue::symbol("green"));
        assert_eq!(codec.serialize(&fractional).unwrap(), json!(1));
        assert!(EnumMapping::new([("a", json!(1)), ("b", json!(1.0))]).is_err());
    }

    #[test]
    fn duplicate_keys_rejected() {
        let err = EnumMapping::new([("a", json!(1)), ("a", json!(2))]).unwrap_err();
        assert_eq!(err.code(), "TYPEDMAP_INVALID_ENUM_MAPPING");
    }

    #[test]
    fn duplicate_values_rejected() {
        assert!(EnumMapping::new([("a", json!(1)), ("b", json!(1))]).is_err());
    }

    #[test]
    fn string_codes_work() {
        let codec = EnumCodec::new(
            EnumMapping::new([("active", json!("A")), ("inactive", json!("I"))]).unwrap(),
        );
        assert_eq!(
            codec.cast(&AttrValue::from_raw(json!("I"))).unwrap(),
            AttrValue::symbol("inactive")
        );
        assert_eq!(codec.serialize(&AttrValue::symbol("active")).unwrap(), json!("A"));
    }
}
