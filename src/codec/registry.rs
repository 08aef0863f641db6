//! Codec registry: resolves a declared type into a codec instance.
//!
//! The catalog is fixed. Callers extend it by handing over a codec they
//! built themselves (`TypeSpec::Codec`) or another view schema
//! (`TypeSpec::Nested`). Unknown identifiers fail when the schema is built,
//! never on first access.

use std::sync::Arc;

use chrono::FixedOffset;
use serde_json::Value;

use super::{
    ArrayCodec, BinaryBooleanCodec, BooleanCodec, Codec, DateCodec, DateTimeCodec, DecimalCodec,
    EnumCodec, EnumMapping, IntegerCodec, MoneyCodec, NestedCodec, StringCodec, ValueCodec,
};
use crate::config::ViewConfig;
use crate::errors::{ViewError, ViewResult};
use crate::schema::Schema;

/// Type identifiers the registry recognizes
pub const BUILTIN_TYPES: &[&str] = &[
    "value",
    "boolean",
    "binary_boolean",
    "string",
    "integer",
    "decimal",
    "date",
    "datetime",
    "money",
    "array",
    "enum",
];

/// Configuration carried by `array` and `enum` declarations
#[derive(Debug, Clone)]
pub enum TypeOf {
    /// Element type of an array
    Element(Box<TypeSpec>),
    /// Symbol-to-raw mapping of an enum
    Mapping(Vec<(String, Value)>),
}

/// Declared type of an attribute
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// Built-in identifier with optional `of:` configuration
    Named { id: String, of: Option<TypeOf> },
    /// Another view schema
    Nested(Arc<Schema>),
    /// Pre-built codec, used as is
    Codec(Arc<dyn Codec>),
}

impl TypeSpec {
    pub fn named(id: impl Into<String>) -> Self {
        TypeSpec::Named {
            id: id.into(),
            of: None,
        }
    }

    pub fn array_of(element: impl Into<TypeSpec>) -> Self {
        TypeSpec::Named {
            id: "array".into(),
            of: Some(TypeOf::Element(Box::new(element.into()))),
        }
    }

    pub fn enum_of<K, I>(mapping: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        TypeSpec::Named {
            id: "enum".into(),
            of: Some(TypeOf::Mapping(
                mapping.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            )),
        }
    }

    pub fn nested(schema: &Arc<Schema>) -> Self {
        TypeSpec::Nested(Arc::clone(schema))
    }

    pub fn codec(codec: impl Codec + 'static) -> Self {
        TypeSpec::Codec(Arc::new(codec))
    }
}

impl Default for TypeSpec {
    fn default() -> Self {
        TypeSpec::named("value")
    }
}

impl From<&str> for TypeSpec {
    fn from(id: &str) -> Self {
        TypeSpec::named(id)
    }
}

impl From<&Arc<Schema>> for TypeSpec {
    fn from(schema: &Arc<Schema>) -> Self {
        TypeSpec::nested(schema)
    }
}

impl From<Arc<Schema>> for TypeSpec {
    fn from(schema: Arc<Schema>) -> Self {
        TypeSpec::Nested(schema)
    }
}

/// Resolves type declarations into codecs.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    config: ViewConfig,
    naive_offset: Option<FixedOffset>,
}

impl CodecRegistry {
    /// Creates a registry, validating the configuration
    pub fn new(config: ViewConfig) -> ViewResult<Self> {
        config.validate()?;
        let naive_offset = config.naive_offset()?;
        Ok(Self {
            config,
            naive_offset,
        })
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Whether `id` names a built-in codec
    pub fn is_builtin(id: &str) -> bool {
        BUILTIN_TYPES.contains(&id)
    }

    /// Resolves the declared type of `attribute` into a codec.
    ///
    /// # Errors
    ///
    /// - `UnknownType` if the identifier is not in the catalog, or `array`
    ///   is declared without an element type
    /// - `InvalidEnumMapping` if `enum` has no mapping or a bad one
    pub fn find(&self, attribute: &str, spec: &TypeSpec) -> ViewResult<Arc<dyn Codec>> {
        let (id, of) = match spec {
            TypeSpec::Codec(codec) => return Ok(Arc::clone(codec)),
            TypeSpec::Nested(schema) => {
                return Ok(Arc::new(NestedCodec::new(Arc::clone(schema))))
            }
            TypeSpec::Named { id, of } => (id.as_str(), of.as_ref()),
        };

        let codec: Arc<dyn Codec> = match (id, of) {
            ("value", _) => Arc::new(ValueCodec),
            ("boolean", _) => Arc::new(BooleanCodec),
            ("binary_boolean", _) => Arc::new(BinaryBooleanCodec),
            ("string", _) => Arc::new(StringCodec),
            ("integer", _) => Arc::new(IntegerCodec),
            ("decimal", _) => Arc::new(DecimalCodec),
            ("date", _) => Arc::new(DateCodec),
            ("datetime", _) => Arc::new(DateTimeCodec::new(self.naive_offset)),
            ("money", _) => Arc::new(MoneyCodec::new(
                self.config.default_currency.clone(),
                self.config.money_scale,
            )),
            ("array", Some(TypeOf::Element(element))) => {
                Arc::new(ArrayCodec::new(self.find(attribute, element)?))
            }
            ("array", _) => {
                return Err(ViewError::UnknownType {
                    attribute: attribute.to_string(),
                    id: "array without element type".into(),
                })
            }
            ("enum", Some(TypeOf::Mapping(entries))) => {
                Arc::new(EnumCodec::new(EnumMapping::new(entries.iter().cloned())?))
            }
            ("enum", _) => {
                return Err(ViewError::InvalidEnumMapping(format!(
                    "enum attribute '{}' declared without a mapping",
                    attribute
                )))
            }
            (other, _) => {
                return Err(ViewError::UnknownType {
                    attribute: attribute.to_string(),
                    id: other.to_string(),
                })
            }
        };
        Ok(codec)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self {
            config: ViewConfig::default(),
            naive_offset: None,
        }
    }
}
