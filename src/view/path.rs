//! Path-addressed reads and writes over a raw map

use serde_json::{Map, Value};

use crate::errors::{json_type_name, ViewError, ViewResult};
use crate::schema::FieldPath;

/// Multi-level lookup; `None` if any segment is absent or not a map.
pub(crate) fn dig<'a>(map: &'a Map<String, Value>, path: &FieldPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    rest.iter()
        .try_fold(map.get(first)?, |value, segment| value.as_object()?.get(segment))
}

/// Assigns `value` at `path`, creating an empty map for every missing (or
/// null) intermediate segment.
///
/// # Errors
///
/// `PathConflict` if an intermediate segment holds a non-map value.
pub(crate) fn bury(map: &mut Map<String, Value>, path: &FieldPath, value: Value) -> ViewResult<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Ok(());
    };

    let mut current = map;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(inner) => inner,
            other => {
                return Err(ViewError::PathConflict {
                    path: path.to_string(),
                    segment: segment.clone(),
                    actual: json_type_name(other).to_string(),
                })
            }
        };
    }
    current.insert(last.clone(), value);
    Ok(())
}
