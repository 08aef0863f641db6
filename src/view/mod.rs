//! Typed views over raw maps
//!
//! A `TypedView` wraps one raw map and reads and writes it through a
//! schema's codecs.
//!
//! # Invariants
//!
//! - The raw map is the single source of truth: typed reads are derived
//!   from it on every call, typed writes commit into it immediately
//! - Missing path segments read as null and are created on write
//! - Nested views returned by getters are detached copies; use
//!   `update_nested` or a setter to write changes back
//!
//! A view is single-writer state. Mutation takes `&mut self`; callers that
//! share a view across threads must serialize writers themselves.

mod path;
mod validation;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

pub use validation::{humanize, underscore, ModelName, ValidationModel};

use crate::codec::AttrValue;
use crate::errors::{json_type_name, ViewError, ViewResult};
use crate::schema::{Predicate, Schema};

/// Accepted construction input: a raw value (which must be a map) or a view
#[derive(Debug, Clone)]
pub enum ViewInput {
    Raw(Value),
    View(TypedView),
}

impl From<Value> for ViewInput {
    fn from(value: Value) -> Self {
        ViewInput::Raw(value)
    }
}

impl From<Map<String, Value>> for ViewInput {
    fn from(map: Map<String, Value>) -> Self {
        ViewInput::Raw(Value::Object(map))
    }
}

impl From<TypedView> for ViewInput {
    fn from(view: TypedView) -> Self {
        ViewInput::View(view)
    }
}

impl From<&TypedView> for ViewInput {
    fn from(view: &TypedView) -> Self {
        ViewInput::View(view.clone())
    }
}

/// A raw map read through a schema
#[derive(Clone)]
pub struct TypedView {
    schema: Arc<Schema>,
    raw: Map<String, Value>,
}

impl TypedView {
    /// Wraps `input` and applies the schema's defaults.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `input` is neither a map nor a view of this schema.
    pub fn new(schema: &Arc<Schema>, input: impl Into<ViewInput>) -> ViewResult<Self> {
        Self::with_values(schema, input, std::iter::empty::<(&str, AttrValue)>())
    }

    /// Wraps `input`, applies defaults, then the explicit `values`
    pub fn with_values<K, V, I>(
        schema: &Arc<Schema>,
        input: impl Into<ViewInput>,
        values: I,
    ) -> ViewResult<Self>
    where
        K: AsRef<str>,
        V: Into<AttrValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut view = Self::wrap(schema, input.into())?;
        view.apply_defaults()?;
        for (name, value) in values {
            view.set(name.as_ref(), value)?;
        }
        Ok(view)
    }

    fn wrap(schema: &Arc<Schema>, input: ViewInput) -> ViewResult<Self> {
        match input {
            ViewInput::Raw(Value::Object(raw)) => Ok(Self {
                schema: Arc::clone(schema),
                raw,
            }),
            ViewInput::View(view) if view.type_name() == schema.name() => Ok(Self {
                schema: Arc::clone(schema),
                raw: view.raw,
            }),
            ViewInput::View(view) => Err(ViewError::InvalidInput {
                schema: schema.name().to_string(),
                actual: format!("'{}' view", view.type_name()),
            }),
            ViewInput::Raw(other) => Err(ViewError::InvalidInput {
                schema: schema.name().to_string(),
                actual: json_type_name(&other).to_string(),
            }),
        }
    }

    /// Fills attributes whose raw value is absent or null. Values already in
    /// the payload are kept.
    fn apply_defaults(&mut self) -> ViewResult<()> {
        let schema = Arc::clone(&self.schema);
        for def in schema.attributes() {
            let Some(default) = def.default() else {
                continue;
            };
            let present = path::dig(&self.raw, def.field_path()).is_some_and(|v| !v.is_null());
            if !present {
                let value = default.resolve(self);
                self.set(def.name(), value)?;
            }
        }
        Ok(())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Name of this view's type
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    // ==================
    // Accessors
    // ==================

    /// Typed getter: the raw value cast through the attribute's codec, then
    /// the post-cast hook if one is declared
    pub fn get(&self, name: &str) -> ViewResult<AttrValue> {
        let def = self.schema.require(name)?;
        let raw = path::dig(&self.raw, def.field_path())
            .cloned()
            .unwrap_or(Value::Null);
        let value = def.codec().cast(&AttrValue::from_raw(raw))?;
        Ok(def.apply_post_cast(value))
    }

    /// Typed setter: casts then serializes, so symbolic and raw inputs
    /// commit the same canonical raw form
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> ViewResult<()> {
        let def = self.schema.require(name)?;
        let codec = def.codec();
        let raw = codec.serialize(&codec.cast(&value.into())?)?;
        path::bury(&mut self.raw, def.field_path(), raw)
    }

    /// Raw getter; `None` when any path segment is missing
    pub fn get_raw(&self, name: &str) -> ViewResult<Option<&Value>> {
        let def = self.schema.require(name)?;
        Ok(path::dig(&self.raw, def.field_path()))
    }

    /// Raw setter; stores `value` without going through the codec
    pub fn set_raw(&mut self, name: &str, value: Value) -> ViewResult<()> {
        let def = self.schema.require(name)?;
        path::bury(&mut self.raw, def.field_path(), value)
    }

    /// Evaluates a boolean or enum-membership predicate (`active?`,
    /// `green?`); the trailing `?` is optional
    pub fn predicate(&self, name: &str) -> ViewResult<bool> {
        let predicate = self.schema.accessors().predicate(name).ok_or_else(|| {
            ViewError::UnknownPredicate {
                schema: self.schema.name().to_string(),
                predicate: name.trim_end_matches('?').to_string(),
            }
        })?;
        match predicate {
            Predicate::Flag { attribute } => Ok(self.get(attribute)?.as_bool().unwrap_or(false)),
            Predicate::EnumMember { attribute, key } => {
                Ok(matches!(self.get(attribute)?, AttrValue::Symbol(s) if s == *key))
            }
        }
    }

    /// Nested bulk assignment (`address_attributes`): builds a nested view
    /// from `attributes`, defaults included, and stores its raw map
    pub fn assign_attributes(&mut self, name: &str, attributes: Map<String, Value>) -> ViewResult<()> {
        let not_nested = || ViewError::NotNested {
            schema: self.schema.name().to_string(),
            attribute: name.to_string(),
        };
        let attribute = self
            .schema
            .accessors()
            .nested_assigner(name)
            .ok_or_else(not_nested)?;
        let def = self.schema.require(attribute)?;
        let nested = def.codec().nested_schema().ok_or_else(not_nested)?;
        let view = TypedView::new(nested, attributes)?;
        path::bury(&mut self.raw, def.field_path(), Value::Object(view.raw))
    }

    /// Reads a nested view, hands it to `f`, and writes its raw map back
    pub fn update_nested<R, F>(&mut self, name: &str, f: F) -> ViewResult<R>
    where
        F: FnOnce(&mut TypedView) -> ViewResult<R>,
    {
        let schema = Arc::clone(&self.schema);
        let def = schema.require(name)?;
        let nested = def
            .codec()
            .nested_schema()
            .ok_or_else(|| ViewError::NotNested {
                schema: schema.name().to_string(),
                attribute: name.to_string(),
            })?;
        let raw = path::dig(&self.raw, def.field_path())
            .cloned()
            .unwrap_or(Value::Null);
        let mut view = match def.codec().cast(&AttrValue::from_raw(raw))? {
            AttrValue::View(view) => view,
            _ => TypedView::new(nested, Map::new())?,
        };
        let out = f(&mut view)?;
        path::bury(&mut self.raw, def.field_path(), Value::Object(view.raw))?;
        Ok(out)
    }

    // ==================
    // Introspection
    // ==================

    /// Every declared attribute with its current typed value, in
    /// declaration order. Recomputed on each call.
    pub fn attributes(&self) -> ViewResult<IndexMap<String, AttrValue>> {
        self.schema
            .attribute_names()
            .map(|name| Ok((name.to_string(), self.get(name)?)))
            .collect()
    }

    /// View-type names recorded by successive merges, oldest first
    pub fn provenance(&self) -> Vec<String> {
        self.raw
            .get(self.schema.provenance_key())
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    // ==================
    // Merge
    // ==================

    /// Shallow-merges `other`'s raw map over this one, records this view's
    /// type in the provenance list, and returns a view of `other`'s type.
    ///
    /// The merged map is wrapped through this type first and `other`'s type
    /// second, so both schemas' defaults apply. The list lives under the
    /// resulting view's provenance key.
    pub fn merge(&self, other: &TypedView) -> ViewResult<TypedView> {
        let mut merged = self.raw.clone();
        for (key, value) in &other.raw {
            merged.insert(key.clone(), value.clone());
        }

        let key = other.schema.provenance_key();
        let slot = merged
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        match slot {
            Value::Array(list) => list.push(Value::String(self.type_name().to_string())),
            found => {
                return Err(ViewError::PathConflict {
                    path: key.to_string(),
                    segment: key.to_string(),
                    actual: json_type_name(found).to_string(),
                })
            }
        }

        let through_self = TypedView::new(&self.schema, merged)?;
        let result = TypedView::new(&other.schema, through_self.raw)?;
        debug!(
            event = "VIEWS_MERGED",
            source = self.type_name(),
            target = other.type_name(),
        );
        Ok(result)
    }

    // ==================
    // Raw map surface
    // ==================

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn into_raw(self) -> Map<String, Value> {
        self.raw
    }

    /// The raw map as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// Top-level raw lookup, bypassing the schema
    pub fn raw_key(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

impl PartialEq for TypedView {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.raw == other.raw
    }
}

impl fmt::Debug for TypedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedView")
            .field("type", &self.schema.name())
            .field("raw", &self.raw)
            .finish()
    }
}

impl Serialize for TypedView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Plain raw form of a view or raw value, ready to emit as JSON.
pub fn serialize(input: impl Into<ViewInput>) -> Value {
    match input.into() {
        ViewInput::Raw(value) => value,
        ViewInput::View(view) => Value::Object(view.raw),
    }
}

/// Wraps every map in `input`. Null yields no views; a single map yields one.
pub fn wrap_all(schema: &Arc<Schema>, input: Value) -> ViewResult<Vec<TypedView>> {
    match input {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| TypedView::new(schema, item))
            .collect(),
        single => Ok(vec![TypedView::new(schema, single)?]),
    }
}
