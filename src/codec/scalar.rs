//! Scalar codecs: passthrough, booleans, strings and numbers

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{
    decimal_to_json, format_date, format_datetime, number_to_decimal, AttrValue, Codec, CodecKind,
};
use crate::errors::{ViewError, ViewResult};

/// Raw strings that cast to `false`; the empty string casts to null.
const FALSE_VALUES: &[&str] = &["0", "f", "F", "false", "FALSE", "off", "OFF"];

/// Passthrough codec
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCodec;

impl Codec for ValueCodec {
    fn name(&self) -> &'static str {
        "value"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Value
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(value.clone())
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(value.to_json())
    }
}

fn truthy_text(s: &str) -> AttrValue {
    if s.is_empty() {
        return AttrValue::Null;
    }
    AttrValue::Bool(!FALSE_VALUES.contains(&s))
}

fn cast_boolean(value: &AttrValue) -> AttrValue {
    match value {
        AttrValue::Null | AttrValue::Raw(Value::Null) => AttrValue::Null,
        AttrValue::Bool(b) | AttrValue::Raw(Value::Bool(b)) => AttrValue::Bool(*b),
        AttrValue::Int(i) => AttrValue::Bool(*i != 0),
        AttrValue::Decimal(d) => AttrValue::Bool(!d.is_zero()),
        AttrValue::String(s) | AttrValue::Symbol(s) | AttrValue::Raw(Value::String(s)) => {
            truthy_text(s)
        }
        AttrValue::Raw(Value::Number(n)) => {
            AttrValue::Bool(number_to_decimal(n).map_or(true, |d| !d.is_zero()))
        }
        _ => AttrValue::Bool(true),
    }
}

/// Boolean codec; raw storage is a JSON boolean
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCodec;

impl Codec for BooleanCodec {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Boolean
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(cast_boolean(value))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(match cast_boolean(value) {
            AttrValue::Bool(b) => Value::Bool(b),
            _ => Value::Null,
        })
    }
}

/// Boolean codec whose raw storage is the string `"1"` or `"0"`
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryBooleanCodec;

impl Codec for BinaryBooleanCodec {
    fn name(&self) -> &'static str {
        "binary_boolean"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::BinaryBoolean
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(cast_boolean(value))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        let flag = matches!(cast_boolean(value), AttrValue::Bool(true));
        Ok(Value::String(if flag { "1" } else { "0" }.to_string()))
    }
}

/// String codec
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec for StringCodec {
    fn name(&self) -> &'static str {
        "string"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::String
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        let text = match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => return Ok(AttrValue::Null),
            AttrValue::String(s) | AttrValue::Symbol(s) | AttrValue::Raw(Value::String(s)) => {
                s.clone()
            }
            AttrValue::Bool(b) | AttrValue::Raw(Value::Bool(b)) => b.to_string(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Decimal(d) => d.to_string(),
            AttrValue::Raw(Value::Number(n)) => n.to_string(),
            AttrValue::Date(d) => format_date(*d),
            AttrValue::DateTime(dt) => format_datetime(dt),
            AttrValue::Money(m) => m.amount.to_string(),
            other => return Err(ViewError::cast(self.name(), other)),
        };
        Ok(AttrValue::String(text))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(match self.cast(value)? {
            AttrValue::String(s) => Value::String(s),
            _ => Value::Null,
        })
    }
}

/// Integer codec
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerCodec;

impl IntegerCodec {
    fn parse_text(&self, s: &str) -> ViewResult<AttrValue> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(AttrValue::Null);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(AttrValue::Int(i));
        }
        // "12.7" truncates like a numeric raw value would
        Decimal::from_str(trimmed)
            .ok()
            .and_then(|d| d.trunc().to_i64())
            .map(AttrValue::Int)
            .ok_or_else(|| ViewError::cast(self.name(), s))
    }
}

impl Codec for IntegerCodec {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Integer
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => Ok(AttrValue::Null),
            AttrValue::Int(i) => Ok(AttrValue::Int(*i)),
            AttrValue::Bool(b) | AttrValue::Raw(Value::Bool(b)) => Ok(AttrValue::Int(i64::from(*b))),
            AttrValue::Decimal(d) => d
                .trunc()
                .to_i64()
                .map(AttrValue::Int)
                .ok_or_else(|| ViewError::cast(self.name(), d)),
            AttrValue::Raw(Value::Number(n)) => n
                .as_i64()
                .or_else(|| number_to_decimal(n).and_then(|d| d.trunc().to_i64()))
                .map(AttrValue::Int)
                .ok_or_else(|| ViewError::cast(self.name(), n)),
            AttrValue::String(s) | AttrValue::Raw(Value::String(s)) => self.parse_text(s),
            other => Err(ViewError::cast(self.name(), other)),
        }
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(match self.cast(value)? {
            AttrValue::Int(i) => Value::from(i),
            _ => Value::Null,
        })
    }
}

/// Decimal codec; raw storage is a JSON number
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCodec;

impl DecimalCodec {
    pub(crate) fn to_decimal(codec: &'static str, value: &AttrValue) -> ViewResult<Option<Decimal>> {
        match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => Ok(None),
            AttrValue::Decimal(d) => Ok(Some(*d)),
            AttrValue::Int(i) => Ok(Some(Decimal::from(*i))),
            AttrValue::Money(m) => Ok(Some(m.amount)),
            AttrValue::Raw(Value::Number(n)) => number_to_decimal(n)
                .map(Some)
                .ok_or_else(|| ViewError::cast(codec, n)),
            AttrValue::String(s) | AttrValue::Raw(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map(Some)
                    .map_err(|_| ViewError::cast(codec, s))
            }
            other => Err(ViewError::cast(codec, other)),
        }
    }
}

impl Codec for DecimalCodec {
    fn name(&self) -> &'static str {
        "decimal"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Decimal
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(Self::to_decimal(self.name(), value)?
            .map(AttrValue::Decimal)
            .unwrap_or(AttrValue::Null))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(Self::to_decimal(self.name(), value)?
            .map(decimal_to_json)
            .unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> AttrValue {
        AttrValue::from_raw(v)
    }

    #[test]
    fn value_codec_passes_through() {
        let codec = ValueCodec;
        assert_eq!(codec.cast(&raw(json!({"a": 1}))).unwrap(), raw(json!({"a": 1})));
        assert_eq!(codec.serialize(&raw(json!([1, 2]))).unwrap(), json!([1, 2]));
    }

    #[test]
    fn boolean_false_values() {
        let codec = BooleanCodec;
        for input in ["0", "f", "F", "false", "FALSE", "off", "OFF"] {
            assert_eq!(codec.cast(&raw(json!(input))).unwrap(), AttrValue::Bool(false));
        }
        assert_eq!(codec.cast(&raw(json!(0))).unwrap(), AttrValue::Bool(false));
        assert_eq!(codec.cast(&raw(json!(false))).unwrap(), AttrValue::Bool(false));
    }

    #[test]
    fn boolean_truthy_and_null() {
        let codec = BooleanCodec;
        assert_eq!(codec.cast(&raw(json!("yes"))).unwrap(), AttrValue::Bool(true));
        assert_eq!(codec.cast(&raw(json!(1))).unwrap(), AttrValue::Bool(true));
        assert_eq!(codec.cast(&raw(json!(""))).unwrap(), AttrValue::Null);
        assert_eq!(codec.cast(&AttrValue::Null).unwrap(), AttrValue::Null);
        assert_eq!(codec.serialize(&AttrValue::Null).unwrap(), Value::Null);
    }

    #[test]
    fn binary_boolean_stores_flag_strings() {
        let codec = BinaryBooleanCodec;
        assert_eq!(codec.serialize(&AttrValue::Bool(true)).unwrap(), json!("1"));
        assert_eq!(codec.serialize(&AttrValue::Bool(false)).unwrap(), json!("0"));
        assert_eq!(codec.serialize(&AttrValue::Null).unwrap(), json!("0"));
        assert_eq!(codec.cast(&raw(json!("1"))).unwrap(), AttrValue::Bool(true));
        assert_eq!(codec.cast(&raw(json!("0"))).unwrap(), AttrValue::Bool(false));
        assert!(codec.is_boolean());
    }

    #[test]
    fn string_stringifies_scalars() {
        let codec = StringCodec;
        assert_eq!(codec.cast(&raw(json!(42))).unwrap(), AttrValue::from("42"));
        assert_eq!(codec.cast(&AttrValue::symbol("x")).unwrap(), AttrValue::from("x"));
        assert!(codec.cast(&raw(json!([1]))).is_err());
    }

    #[test]
    fn integer_parses_strings_and_truncates() {
        let codec = IntegerCodec;
        assert_eq!(codec.cast(&raw(json!("18"))).unwrap(), AttrValue::Int(18));
        assert_eq!(codec.cast(&raw(json!(" 7 "))).unwrap(), AttrValue::Int(7));
        assert_eq!(codec.cast(&raw(json!(12.9))).unwrap(), AttrValue::Int(12));
        assert_eq!(codec.cast(&raw(json!("12.9"))).unwrap(), AttrValue::Int(12));
        assert_eq!(codec.cast(&raw(json!(""))).unwrap(), AttrValue::Null);
        assert_eq!(codec.serialize(&raw(json!("20"))).unwrap(), json!(20));
    }

    #[test]
    fn integer_rejects_garbage() {
        let err = IntegerCodec.cast(&raw(json!("abc"))).unwrap_err();
        assert_eq!(err.code(), "TYPEDMAP_CAST_FAILED");
    }

    #[test]
    fn decimal_keeps_precision_from_strings() {
        let codec = DecimalCodec;
        assert_eq!(
            codec.cast(&raw(json!("19.99"))).unwrap(),
            AttrValue::Decimal(Decimal::new(1999, 2))
        );
        assert_eq!(codec.serialize(&raw(json!("19.99"))).unwrap(), json!(19.99));
        assert_eq!(codec.serialize(&AttrValue::Int(3)).unwrap(), json!(3));
    }
}
