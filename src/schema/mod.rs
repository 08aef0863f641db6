//! Schema subsystem for typedmap
//!
//! A schema is the immutable table of attribute definitions a view type
//! exposes over its raw map.
//!
//! # Design Principles
//!
//! - Built once by `SchemaBuilder`, frozen behind an `Arc`
//! - Codecs resolved at declaration; unknown types never reach runtime
//! - Declaration order preserved
//! - Never shared or merged between unrelated view types

mod accessor;
mod builder;
mod types;

use std::fmt;

use indexmap::IndexMap;

pub use accessor::{pluralize, AccessorTable, Predicate};
pub use builder::{Attribute, SchemaBuilder};
pub use types::{AttributeDef, DefaultProducer, DefaultValue, FieldPath, PostCastHook};

use crate::codec::EnumMapping;
use crate::errors::{ViewError, ViewResult};

/// Attribute table of one view type
pub struct Schema {
    name: String,
    attributes: IndexMap<String, AttributeDef>,
    accessors: AccessorTable,
    human_names: IndexMap<String, String>,
    provenance_key: String,
}

impl Schema {
    /// View-type name, recorded in merge provenance
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.get(name)
    }

    /// Like `attribute`, failing with `UnknownAttribute`
    pub fn require(&self, name: &str) -> ViewResult<&AttributeDef> {
        self.attributes
            .get(name)
            .ok_or_else(|| ViewError::UnknownAttribute {
                schema: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    /// Definitions in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.values()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Collected defaults, in declaration order
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &DefaultValue)> {
        self.attributes
            .values()
            .filter_map(|def| def.default().map(|d| (def.name(), d)))
    }

    pub fn accessors(&self) -> &AccessorTable {
        &self.accessors
    }

    /// Full symbolic mapping of an enum attribute, addressed by its
    /// pluralized name (`favorite_colors` for `favorite_color`)
    pub fn enum_values(&self, listing: &str) -> Option<&EnumMapping> {
        let attribute = self.accessors.enum_listing(listing)?;
        self.attributes.get(attribute)?.codec().enum_mapping()
    }

    /// Human-readable name override for an attribute
    pub fn human_name(&self, attribute: &str) -> Option<&str> {
        self.human_names.get(attribute).map(String::as_str)
    }

    /// Raw key holding the merge provenance list
    pub fn provenance_key(&self) -> &str {
        &self.provenance_key
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("attributes", &self.attributes.values().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TypeSpec;
    use serde_json::json;

    fn person() -> std::sync::Arc<Schema> {
        SchemaBuilder::new("Person")
            .declare(Attribute::new("name").ty("string").default("anonymous"))
            .unwrap()
            .declare(Attribute::new("age").field("Idade").ty("integer"))
            .unwrap()
            .declare(
                Attribute::new("favorite_color")
                    .field("favoriteColor")
                    .ty(TypeSpec::enum_of([
                        ("red", json!(0)),
                        ("green", json!(1)),
                        ("blue", json!(2)),
                    ])),
            )
            .unwrap()
            .build()
    }

    #[test]
    fn preserves_declaration_order() {
        let schema = person();
        let names: Vec<_> = schema.attribute_names().collect();
        assert_eq!(names, vec!["name", "age", "favorite_color"]);
    }

    #[test]
    fn require_unknown_attribute_fails() {
        let schema = person();
        let err = schema.require("height").unwrap_err();
        assert_eq!(err.code(), "TYPEDMAP_UNKNOWN_ATTRIBUTE");
    }

    #[test]
    fn defaults_collected() {
        let schema = person();
        let defaults: Vec<_> = schema.defaults().map(|(name, _)| name).collect();
        assert_eq!(defaults, vec!["name"]);
    }

    #[test]
    fn enum_listing_uses_plural_name() {
        let schema = person();
        let mapping = schema.enum_values("favorite_colors").unwrap();
        let keys: Vec<_> = mapping.keys().collect();
        assert_eq!(keys, vec!["red", "green", "blue"]);
        assert!(schema.enum_values("favorite_color").is_none());
    }

    #[test]
    fn enum_keys_become_predicates() {
        let schema = person();
        let names: Vec<_> = schema.accessors().predicate_names().collect();
        assert_eq!(names, vec!["red?", "green?", "blue?"]);
    }

    #[test]
    fn provenance_key_comes_from_config() {
        assert_eq!(person().provenance_key(), "_merged_from");
    }
}
