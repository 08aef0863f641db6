//! Array codec: applies an element codec to every item

use std::sync::Arc;

use serde_json::Value;

use super::{AttrValue, Codec, CodecKind};
use crate::errors::{ViewError, ViewResult};

#[derive(Debug, Clone)]
pub struct ArrayCodec {
    element: Arc<dyn Codec>,
}

impl ArrayCodec {
    pub fn new(element: Arc<dyn Codec>) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Arc<dyn Codec> {
        &self.element
    }
}

impl Codec for ArrayCodec {
    fn name(&self) -> &'static str {
        "array"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Array
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        let items = match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => return Ok(AttrValue::Null),
            AttrValue::List(items) => items
                .iter()
                .map(|item| self.element.cast(item))
                .collect::<ViewResult<Vec<_>>>()?,
            AttrValue::Raw(Value::Array(items)) => items
                .iter()
                .map(|item| self.element.cast(&AttrValue::from_raw(item.clone())))
                .collect::<ViewResult<Vec<_>>>()?,
            other => return Err(ViewError::cast(self.name(), other)),
        };
        Ok(AttrValue::List(items.into()))
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        let items = match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => return Ok(Value::Null),
            AttrValue::List(items) => items
                .iter()
                .map(|item| self.element.serialize(item))
                .collect::<ViewResult<Vec<_>>>()?,
            AttrValue::Raw(Value::Array(items)) => items
                .iter()
                .map(|item| self.element.serialize(&AttrValue::from_raw(item.clone())))
                .collect::<ViewResult<Vec<_>>>()?,
            other => return Err(ViewError::cast(self.name(), other)),
        };
        Ok(Value::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DateCodec, IntegerCodec};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn casts_each_element() {
        let codec = ArrayCodec::new(Arc::new(IntegerCodec));
        let value = codec.cast(&AttrValue::from_raw(json!(["1", 2, "3"]))).unwrap();
        assert_eq!(
            value.as_list().unwrap(),
            &[AttrValue::Int(1), AttrValue::Int(2), AttrValue::Int(3)]
        );
    }

    #[test]
    fn serializes_each_element() {
        let codec = ArrayCodec::new(Arc::new(DateCodec));
        let d = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        let value = AttrValue::list(vec![AttrValue::Date(d)]);
        assert_eq!(codec.serialize(&value).unwrap(), json!(["2023-07-01"]));
    }

    #[test]
    fn nil_stays_nil() {
        let codec = ArrayCodec::new(Arc::new(IntegerCodec));
        assert_eq!(codec.cast(&AttrValue::Null).unwrap(), AttrValue::Null);
        assert_eq!(codec.serialize(&AttrValue::Null).unwrap(), Value::Null);
    }

    #[test]
    fn scalar_input_is_rejected() {
        let codec = ArrayCodec::new(Arc::new(IntegerCodec));
        assert!(codec.cast(&AttrValue::from_raw(json!(1))).is_err());
    }

    #[test]
    fn element_failure_propagates() {
        let codec = ArrayCodec::new(Arc::new(IntegerCodec));
        assert!(codec.cast(&AttrValue::from_raw(json!(["x"]))).is_err());
    }
}
