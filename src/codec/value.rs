//! Typed attribute values
//!
//! `AttrValue` is what getters return and setters accept. Raw payload data
//! enters as `AttrValue::Raw` and leaves codecs as a typed variant.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::view::TypedView;

/// A currency amount
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Absent or explicitly null
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    String(String),
    /// Symbolic enum key
    Symbol(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Money(Money),
    /// Immutable sequence; edit by assigning a new list
    List(Arc<[AttrValue]>),
    /// Nested typed view
    View(TypedView),
    /// Untyped raw payload value
    Raw(Value),
}

impl AttrValue {
    /// Lifts a raw payload value, mapping JSON null to `Null`
    pub fn from_raw(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            other => AttrValue::Raw(other),
        }
    }

    /// Creates a symbolic enum key
    pub fn symbol(key: impl Into<String>) -> Self {
        AttrValue::Symbol(key.into())
    }

    /// Creates an immutable list
    pub fn list(items: impl IntoIterator<Item = AttrValue>) -> Self {
        AttrValue::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null | AttrValue::Raw(Value::Null))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            AttrValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the text of a `String` or `Symbol`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) | AttrValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            AttrValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            AttrValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<&Money> {
        match self {
            AttrValue::Money(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&TypedView> {
        match self {
            AttrValue::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn into_view(self) -> Option<TypedView> {
        match self {
            AttrValue::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            AttrValue::Raw(v) => Some(v),
            _ => None,
        }
    }

    /// Best-effort JSON rendering of any value.
    ///
    /// Codecs produce the canonical raw form; this is for comparisons and
    /// display of values that have not been through a codec.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Int(i) => Value::from(*i),
            AttrValue::Decimal(d) => decimal_to_json(*d),
            AttrValue::String(s) | AttrValue::Symbol(s) => Value::String(s.clone()),
            AttrValue::Date(d) => Value::String(format_date(*d)),
            AttrValue::DateTime(dt) => Value::String(format_datetime(dt)),
            AttrValue::Money(m) => decimal_to_json(m.amount),
            AttrValue::List(items) => Value::Array(items.iter().map(AttrValue::to_json).collect()),
            AttrValue::View(view) => Value::Object(view.raw().clone()),
            AttrValue::Raw(v) => v.clone(),
        }
    }
}

impl PartialEq<&str> for AttrValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::from_raw(value)
    }
}

impl From<Map<String, Value>> for AttrValue {
    fn from(map: Map<String, Value>) -> Self {
        AttrValue::Raw(Value::Object(map))
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        AttrValue::Int(i64::from(i))
    }
}

impl From<Decimal> for AttrValue {
    fn from(d: Decimal) -> Self {
        AttrValue::Decimal(d)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<NaiveDate> for AttrValue {
    fn from(d: NaiveDate) -> Self {
        AttrValue::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for AttrValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        AttrValue::DateTime(dt)
    }
}

impl From<Money> for AttrValue {
    fn from(m: Money) -> Self {
        AttrValue::Money(m)
    }
}

impl From<TypedView> for AttrValue {
    fn from(view: TypedView) -> Self {
        AttrValue::View(view)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(items: Vec<AttrValue>) -> Self {
        AttrValue::List(items.into())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

/// Renders a decimal as an exact JSON number.
///
/// Whole values become integers; fractional values keep every digit of the
/// normalized decimal text.
pub(crate) fn decimal_to_json(d: Decimal) -> Value {
    let normalized = d.normalize();
    if normalized.fract().is_zero() {
        if let Some(i) = normalized.to_i64() {
            return Value::from(i);
        }
    }
    let text = normalized.to_string();
    Number::from_str(&text)
        .map(Value::Number)
        .unwrap_or(Value::String(text))
}

/// Parses a JSON number into a decimal from its exact text.
pub(crate) fn number_to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

pub(crate) fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
