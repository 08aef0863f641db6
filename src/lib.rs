//! typedmap - Schema-driven typed views over raw JSON maps
//!
//! A view type declares named attributes, each stored under a key (or key
//! path) of a raw map and converted by a codec. Reads cast, writes
//! serialize and commit straight back into the raw map, so the payload is
//! always ready to forward as-is.
//!
//! Subsystems:
//! - `codec`: raw <-> typed conversions and the type catalog
//! - `schema`: attribute declarations and generated accessor names
//! - `view`: the `TypedView` wrapper, merge and bulk helpers

pub mod codec;
pub mod config;
pub mod errors;
pub mod schema;
pub mod view;

pub use codec::{AttrValue, Codec, CodecKind, CodecRegistry, EnumMapping, Money, TypeSpec};
pub use config::{DuplicatePolicy, ViewConfig};
pub use errors::{ErrorClass, ViewError, ViewResult};
pub use schema::{Attribute, Schema, SchemaBuilder};
pub use view::{serialize, wrap_all, ModelName, TypedView, ValidationModel, ViewInput};
