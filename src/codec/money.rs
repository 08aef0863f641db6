//! Money codec: raw storage is a bare number, the typed value carries a
//! currency.

use serde_json::Value;

use super::scalar::DecimalCodec;
use super::{decimal_to_json, AttrValue, Codec, CodecKind, Money};
use crate::errors::ViewResult;

#[derive(Debug, Clone)]
pub struct MoneyCodec {
    currency: String,
    scale: u32,
}

impl MoneyCodec {
    pub fn new(currency: impl Into<String>, scale: u32) -> Self {
        Self {
            currency: currency.into(),
            scale,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    fn to_money(&self, value: &AttrValue) -> ViewResult<Option<Money>> {
        if let AttrValue::Money(m) = value {
            return Ok(Some(Money::new(m.amount.round_dp(self.scale), m.currency.clone())));
        }
        Ok(DecimalCodec::to_decimal(self.name(), value)?
            .map(|amount| Money::new(amount.round_dp(self.scale), self.currency.clone())))
    }
}

impl Default for MoneyCodec {
    fn default() -> Self {
        Self::new("USD", 2)
    }
}

impl Codec for MoneyCodec {
    fn name(&self) -> &'static str {
        "money"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Money
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        Ok(self.to_money(value)?.map_or(AttrValue::Null, AttrValue::Money))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        Ok(self
            .to_money(value)?
            .map_or(Value::Null, |m| decimal_to_json(m.amount)))
    }
}
