//! Attribute definition types

use std::fmt;
use std::sync::Arc;

use crate::codec::{AttrValue, Codec};
use crate::view::TypedView;

/// Ordered key sequence locating a value inside a (possibly nested) map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Returns `None` for an empty path
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Option<Self> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    /// Single-segment path
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![key.into()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Producer for a computed default; receives the view under construction
pub type DefaultProducer = Arc<dyn Fn(&TypedView) -> AttrValue + Send + Sync>;

/// Per-element transform applied after `cast`
pub type PostCastHook = Arc<dyn Fn(AttrValue) -> AttrValue + Send + Sync>;

/// Default value of an attribute
#[derive(Clone)]
pub enum DefaultValue {
    Static(AttrValue),
    Producer(DefaultProducer),
}

impl DefaultValue {
    /// Evaluates the default for `view`
    pub fn resolve(&self, view: &TypedView) -> AttrValue {
        match self {
            DefaultValue::Static(value) => value.clone(),
            DefaultValue::Producer(producer) => producer(view),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Static metadata for one declared attribute
#[derive(Clone)]
pub struct AttributeDef {
    pub(crate) name: String,
    pub(crate) field_path: FieldPath,
    pub(crate) codec: Arc<dyn Codec>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) post_cast: Option<PostCastHook>,
}

impl AttributeDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_path(&self) -> &FieldPath {
        &self.field_path
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn has_post_cast(&self) -> bool {
        self.post_cast.is_some()
    }

    /// Applies the post-cast hook to each element; a scalar counts as a
    /// single element and `Null` is left untouched.
    pub(crate) fn apply_post_cast(&self, value: AttrValue) -> AttrValue {
        let Some(hook) = &self.post_cast else {
            return value;
        };
        match value {
            AttrValue::Null => AttrValue::Null,
            AttrValue::List(items) => {
                AttrValue::List(items.iter().cloned().map(|item| hook(item)).collect())
            }
            scalar => hook(scalar),
        }
    }
}

impl fmt::Debug for AttributeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDef")
            .field("name", &self.name)
            .field("field_path", &self.field_path)
            .field("codec", &self.codec.name())
            .field("default", &self.default)
            .field("post_cast", &self.post_cast.is_some())
            .finish()
    }
}
