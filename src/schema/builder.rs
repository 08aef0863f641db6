//! Schema builder: attribute declarations resolved into a `Schema`

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::accessor::AccessorTable;
use super::types::{AttributeDef, DefaultValue, FieldPath, PostCastHook};
use super::Schema;
use crate::codec::{AttrValue, CodecRegistry, TypeSpec};
use crate::config::DuplicatePolicy;
use crate::errors::{ViewError, ViewResult};
use crate::view::TypedView;

/// One attribute declaration.
///
/// ```ignore
/// Attribute::new("age").field("Idade").ty("integer")
/// ```
#[derive(Clone)]
pub struct Attribute {
    name: String,
    path: Option<Vec<String>>,
    ty: TypeSpec,
    default: Option<DefaultValue>,
    post_cast: Option<PostCastHook>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            ty: TypeSpec::default(),
            default: None,
            post_cast: None,
        }
    }

    /// Stores the attribute under a different top-level key
    pub fn field(mut self, key: impl Into<String>) -> Self {
        self.path = Some(vec![key.into()]);
        self
    }

    /// Stores the attribute under a nested key sequence
    pub fn path<S: Into<String>>(mut self, segments: impl IntoIterator<Item = S>) -> Self {
        self.path = Some(segments.into_iter().map(Into::into).collect());
        self
    }

    pub fn ty(mut self, ty: impl Into<TypeSpec>) -> Self {
        self.ty = ty.into();
        self
    }

    pub fn default(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    /// Default computed from the view under construction
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn(&TypedView) -> AttrValue + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Producer(Arc::new(producer)));
        self
    }

    /// Transform applied to each element after casting
    pub fn post_cast<F>(mut self, hook: F) -> Self
    where
        F: Fn(AttrValue) -> AttrValue + Send + Sync + 'static,
    {
        self.post_cast = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("ty", &self.ty)
            .field("default", &self.default)
            .field("post_cast", &self.post_cast.is_some())
            .finish()
    }
}

/// Builds a `Schema` one declaration at a time.
///
/// Each `declare` resolves the attribute's codec immediately, so an unknown
/// type identifier fails at declaration rather than on first access.
pub struct SchemaBuilder {
    registry: Arc<CodecRegistry>,
    name: String,
    attributes: IndexMap<String, AttributeDef>,
    accessors: AccessorTable,
    human_names: IndexMap<String, String>,
}

impl SchemaBuilder {
    /// Creates a builder backed by a default registry
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, Arc::new(CodecRegistry::default()))
    }

    pub fn with_registry(name: impl Into<String>, registry: Arc<CodecRegistry>) -> Self {
        Self {
            registry,
            name: name.into(),
            attributes: IndexMap::new(),
            accessors: AccessorTable::default(),
            human_names: IndexMap::new(),
        }
    }

    /// Appends one attribute definition and its derived accessors.
    ///
    /// # Errors
    ///
    /// - `UnknownType` / `InvalidEnumMapping` if the type does not resolve
    /// - `EmptyFieldPath` if the attribute is remapped to no key at all
    /// - `DuplicateAttribute` / `DuplicateAccessor` under the forbid policy
    pub fn declare(mut self, attribute: Attribute) -> ViewResult<Self> {
        let Attribute {
            name,
            path,
            ty,
            default,
            post_cast,
        } = attribute;

        let field_path = match path {
            None => FieldPath::key(name.clone()),
            Some(segments) => FieldPath::new(segments).ok_or_else(|| ViewError::EmptyFieldPath {
                schema: self.name.clone(),
                attribute: name.clone(),
            })?,
        };
        let codec = self.registry.find(&name, &ty)?;

        let policy = self.registry.config().duplicate_policy;
        if self.attributes.contains_key(&name) {
            match policy {
                DuplicatePolicy::Forbid => {
                    return Err(ViewError::DuplicateAttribute {
                        schema: self.name.clone(),
                        attribute: name,
                    })
                }
                DuplicatePolicy::Warn => {
                    warn!(
                        event = "ATTRIBUTE_REDECLARED",
                        schema = %self.name,
                        attribute = %name,
                    );
                    self.accessors.remove_attribute(&name);
                }
            }
        }

        let def = AttributeDef {
            name: name.clone(),
            field_path,
            codec,
            default,
            post_cast,
        };
        self.accessors.register(&self.name, &def, policy)?;
        self.attributes.insert(name, def);
        Ok(self)
    }

    /// Overrides the human-readable name reported for an attribute
    pub fn human_name(mut self, attribute: impl Into<String>, text: impl Into<String>) -> Self {
        self.human_names.insert(attribute.into(), text.into());
        self
    }

    /// Freezes the schema
    pub fn build(self) -> Arc<Schema> {
        debug!(
            event = "SCHEMA_BUILT",
            schema = %self.name,
            attributes = self.attributes.len(),
        );
        Arc::new(Schema {
            name: self.name,
            attributes: self.attributes,
            accessors: self.accessors,
            human_names: self.human_names,
            provenance_key: self.registry.config().provenance_key.clone(),
        })
    }
}
