//! Nested-view codec: a raw sub-map read through another schema

use std::sync::Arc;

use serde_json::Value;

use super::{AttrValue, Codec, CodecKind};
use crate::errors::{ViewError, ViewResult};
use crate::schema::Schema;
use crate::view::{TypedView, ViewInput};

#[derive(Debug, Clone)]
pub struct NestedCodec {
    schema: Arc<Schema>,
}

impl NestedCodec {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }
}

impl Codec for NestedCodec {
    fn name(&self) -> &'static str {
        "nested"
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Nested
    }

    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue> {
        let input = match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => return Ok(AttrValue::Null),
            AttrValue::View(view) => ViewInput::View(view.clone()),
            AttrValue::Raw(raw) => ViewInput::Raw(raw.clone()),
            other => return Err(ViewError::cast(self.name(), other)),
        };
        TypedView::new(&self.schema, input).map(AttrValue::View)
    }

    fn serialize(&self, value: &AttrValue) -> ViewResult<Value> {
        match value {
            AttrValue::Null | AttrValue::Raw(Value::Null) => Ok(Value::Null),
            AttrValue::View(view) => Ok(view.to_value()),
            AttrValue::Raw(raw @ Value::Object(_)) => Ok(raw.clone()),
            other => Err(ViewError::cast(self.name(), other)),
        }
    }

    fn nested_schema(&self) -> Option<&Arc<Schema>> {
        Some(&self.schema)
    }
}
