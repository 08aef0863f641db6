//! Codec subsystem for typedmap
//!
//! A codec converts between the raw representation stored in a payload and
//! the typed value callers work with.
//!
//! # Contract
//!
//! - `cast` accepts raw-shaped input (`AttrValue::Raw`) or any typed value,
//!   and maps `Null` to `Null`
//! - `serialize` accepts raw-shaped input or the output of `cast`, and
//!   produces the canonical raw form
//! - Codecs are immutable once built and shared across views

mod array;
mod enumeration;
mod money;
mod nested;
mod registry;
mod scalar;
mod temporal;
mod value;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::ViewResult;
use crate::schema::Schema;

pub use array::ArrayCodec;
pub use enumeration::{EnumCodec, EnumMapping};
pub use money::MoneyCodec;
pub use nested::NestedCodec;
pub use registry::{CodecRegistry, TypeOf, TypeSpec};
pub use scalar::{
    BinaryBooleanCodec, BooleanCodec, DecimalCodec, IntegerCodec, StringCodec, ValueCodec,
};
pub use temporal::{DateCodec, DateTimeCodec};
pub use value::{AttrValue, Money};

pub(crate) use value::{decimal_to_json, format_date, format_datetime, number_to_decimal};

/// Family a codec belongs to; drives which accessors a schema generates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Value,
    Boolean,
    BinaryBoolean,
    String,
    Integer,
    Decimal,
    Date,
    DateTime,
    Money,
    Array,
    Enum,
    Nested,
    /// Caller-supplied codec
    Custom,
}

/// Bidirectional conversion between raw payload values and typed values.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Identifier used in error messages
    fn name(&self) -> &'static str;

    fn kind(&self) -> CodecKind {
        CodecKind::Custom
    }

    /// Converts raw (or already typed) input into the typed value.
    fn cast(&self, value: &AttrValue) -> ViewResult<AttrValue>;

    /// Converts a typed (or raw) value into its canonical raw form.
    fn serialize(&self, value: &AttrValue) -> ViewResult<Value>;

    /// Whether the codec belongs to the boolean family
    fn is_boolean(&self) -> bool {
        matches!(self.kind(), CodecKind::Boolean | CodecKind::BinaryBoolean)
    }

    /// Symbol-to-raw mapping for enum codecs
    fn enum_mapping(&self) -> Option<&EnumMapping> {
        None
    }

    /// Target schema for nested-view codecs
    fn nested_schema(&self) -> Option<&Arc<Schema>> {
        None
    }
}
