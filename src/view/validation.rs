//! Adapter for validation collaborators
//!
//! Validation frameworks want a model name, an i18n scope and human
//! attribute names. Views answer those from their schema; value checks
//! themselves are the caller's concern.

use serde::Serialize;

use super::TypedView;
use crate::errors::ViewResult;
use crate::schema::pluralize;

/// I18n namespace reported by every view
pub const I18N_SCOPE: &str = "typedmap";

/// Naming facts about a view type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelName {
    /// Type name as declared (`FavoriteThing`)
    pub name: String,
    /// snake_case form (`favorite_thing`)
    pub singular: String,
    /// Plural of `singular` (`favorite_things`)
    pub plural: String,
    /// Display form (`Favorite thing`)
    pub human: String,
    /// Key under which form parameters are nested
    pub param_key: String,
}

impl ModelName {
    pub fn new(name: &str) -> Self {
        let singular = underscore(name);
        Self {
            name: name.to_string(),
            plural: pluralize(&singular),
            human: humanize(&singular),
            param_key: singular.clone(),
            singular,
        }
    }
}

/// What a validation collaborator may ask of a model
pub trait ValidationModel {
    fn model_name(&self) -> ModelName;

    fn i18n_scope(&self) -> &'static str {
        I18N_SCOPE
    }

    fn human_attribute_name(&self, attribute: &str) -> String;

    /// Hook for per-value assertions. Views accept every value.
    fn assert_valid_value(&self, _attribute: &str) -> ViewResult<()> {
        Ok(())
    }
}

impl ValidationModel for TypedView {
    fn model_name(&self) -> ModelName {
        ModelName::new(self.type_name())
    }

    fn human_attribute_name(&self, attribute: &str) -> String {
        match self.schema().human_name(attribute) {
            Some(text) => text.to_string(),
            None => humanize(attribute),
        }
    }
}

/// `FavoriteColor` -> `favorite_color`; `Admin::User` -> `admin_user`
pub fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    let normalized = name.replace("::", "_");
    let mut chars = normalized.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_uppercase() {
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let acronym_end = prev.is_some_and(char::is_uppercase)
                && chars.peek().is_some_and(|n| n.is_lowercase());
            if after_lower || acronym_end {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(if c == '-' || c == ' ' { '_' } else { c });
        }
        prev = Some(c);
    }
    out
}

/// `favorite_color` -> `Favorite color`; a trailing `_id` is dropped
pub fn humanize(attribute: &str) -> String {
    let base = attribute.strip_suffix("_id").unwrap_or(attribute);
    let words = base.replace('_', " ");
    let mut chars = words.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, SchemaBuilder};
    use serde_json::json;

    #[test]
    fn underscore_splits_words() {
        assert_eq!(underscore("Person"), "person");
        assert_eq!(underscore("FavoriteColor"), "favorite_color");
        assert_eq!(underscore("HTTPRequest"), "http_request");
        assert_eq!(underscore("Admin::User"), "admin_user");
    }

    #[test]
    fn humanize_attribute_names() {
        assert_eq!(humanize("favorite_color"), "Favorite color");
        assert_eq!(humanize("owner_id"), "Owner");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn model_name_from_view_type() {
        let schema = SchemaBuilder::new("FavoriteThing").build();
        let view = TypedView::new(&schema, json!({})).unwrap();
        let name = view.model_name();
        assert_eq!(name.name, "FavoriteThing");
        assert_eq!(name.singular, "favorite_thing");
        assert_eq!(name.plural, "favorite_things");
        assert_eq!(name.human, "Favorite thing");
        assert_eq!(name.param_key, "favorite_thing");
        assert_eq!(view.i18n_scope(), "typedmap");
    }

    #[test]
    fn human_attribute_name_prefers_override() {
        let schema = SchemaBuilder::new("Person")
            .declare(Attribute::new("age").field("Idade").ty("integer"))
            .unwrap()
            .human_name("age", "Idade (anos)")
            .build();
        let view = TypedView::new(&schema, json!({})).unwrap();
        assert_eq!(view.human_attribute_name("age"), "Idade (anos)");
        assert_eq!(view.human_attribute_name("favorite_color"), "Favorite color");
        assert!(view.assert_valid_value("age").is_ok());
    }
}
