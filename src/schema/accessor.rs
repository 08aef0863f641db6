//! Accessor table: the derived, name-dispatched surface of a schema.
//!
//! Every attribute gets a getter and setter (dispatched by attribute name on
//! the view). On top of that, depending on the resolved codec:
//! - boolean codecs add a `name?` predicate
//! - enum codecs add one `key?` predicate per symbolic key, plus a listing
//!   of the mapping under the pluralized attribute name
//! - nested-view codecs add a `name_attributes` bulk assigner

use indexmap::IndexMap;
use tracing::warn;

use super::types::AttributeDef;
use crate::config::DuplicatePolicy;
use crate::errors::{ViewError, ViewResult};

/// What a predicate evaluates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Typed value of a boolean attribute
    Flag { attribute: String },
    /// Whether an enum attribute currently holds `key`
    EnumMember { attribute: String, key: String },
}

impl Predicate {
    pub fn attribute(&self) -> &str {
        match self {
            Predicate::Flag { attribute } | Predicate::EnumMember { attribute, .. } => attribute,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessorTable {
    predicates: IndexMap<String, Predicate>,
    enum_listings: IndexMap<String, String>,
    nested_assigners: IndexMap<String, String>,
}

impl AccessorTable {
    /// Registers the accessors derived from `def`.
    pub(crate) fn register(
        &mut self,
        schema: &str,
        def: &AttributeDef,
        policy: DuplicatePolicy,
    ) -> ViewResult<()> {
        if def.codec.is_boolean() {
            let predicate = Predicate::Flag {
                attribute: def.name.clone(),
            };
            insert_checked(&mut self.predicates, schema, &def.name, predicate, policy, "?")?;
        }

        if let Some(mapping) = def.codec.enum_mapping() {
            for key in mapping.keys() {
                let predicate = Predicate::EnumMember {
                    attribute: def.name.clone(),
                    key: key.to_string(),
                };
                insert_checked(&mut self.predicates, schema, key, predicate, policy, "?")?;
            }
            let listing = pluralize(&def.name);
            insert_checked(
                &mut self.enum_listings,
                schema,
                &listing,
                def.name.clone(),
                policy,
                "",
            )?;
        }

        if def.codec.nested_schema().is_some() {
            let assigner = format!("{}_attributes", def.name);
            insert_checked(
                &mut self.nested_assigners,
                schema,
                &assigner,
                def.name.clone(),
                policy,
                "",
            )?;
        }

        Ok(())
    }

    /// Drops every accessor derived from `attribute` (used when a
    /// redeclaration replaces it)
    pub(crate) fn remove_attribute(&mut self, attribute: &str) {
        self.predicates.retain(|_, p| p.attribute() != attribute);
        self.enum_listings.retain(|_, a| a != attribute);
        self.nested_assigners.retain(|_, a| a != attribute);
    }

    /// Looks up a predicate; the trailing `?` is optional
    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name.strip_suffix('?').unwrap_or(name))
    }

    pub fn predicate_names(&self) -> impl Iterator<Item = String> + '_ {
        self.predicates.keys().map(|name| format!("{}?", name))
    }

    /// Attribute behind an enum listing name such as `favorite_colors`
    pub fn enum_listing(&self, listing: &str) -> Option<&str> {
        self.enum_listings.get(listing).map(String::as_str)
    }

    /// Attribute behind a nested assigner; `address_attributes` or `address`
    pub fn nested_assigner(&self, name: &str) -> Option<&str> {
        self.nested_assigners
            .get(name)
            .or_else(|| self.nested_assigners.get(&format!("{}_attributes", name)))
            .map(String::as_str)
    }
}

fn insert_checked<V>(
    table: &mut IndexMap<String, V>,
    schema: &str,
    name: &str,
    value: V,
    policy: DuplicatePolicy,
    suffix: &str,
) -> ViewResult<()> {
    if table.contains_key(name) {
        let accessor = format!("{}{}", name, suffix);
        match policy {
            DuplicatePolicy::Forbid => {
                return Err(ViewError::DuplicateAccessor {
                    schema: schema.to_string(),
                    accessor,
                })
            }
            DuplicatePolicy::Warn => {
                warn!(event = "ACCESSOR_REDECLARED", schema, accessor = %accessor);
            }
        }
    }
    table.insert(name.to_string(), value);
    Ok(())
}

/// English plural of a snake_case attribute name
pub fn pluralize(word: &str) -> String {
    const ES_SUFFIXES: &[&str] = &["s", "x", "z", "ch", "sh"];
    if ES_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before_y = stem.chars().last();
        if before_y.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}
