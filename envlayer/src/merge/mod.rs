//! Recursive merge of configuration values.
//!
//! The engine walks every own key (for mappings) or index (for sequences) of
//! each source and writes it into the target:
//!
//! - absent incoming values are skipped, so they never clobber what is there;
//! - in deep mode, incoming mappings and sequences are merged into the
//!   existing value when it has the same shape, or into a fresh empty
//!   container when it does not;
//! - everything else (scalars, nulls, opaque handles, and every value in
//!   shallow mode) replaces the existing value.
//!
//! Sequences merge by position. Index 0 of the source lands on index 0 of the
//! target; a shorter source leaves trailing target items in place and a longer
//! one appends its extra items. A mapping source keyed by index can overwrite
//! an item or append right after the last one; keys further out are skipped.
//!
//! Sources are borrowed and the target is borrowed mutably, so a value can
//! never be merged into itself and no part of a source is aliased into the
//! result.
//!
//! ```rust
//! use envlayer::merge::deep_merge;
//! use envlayer::ConfigValue;
//! use serde_json::json;
//!
//! let mut target = ConfigValue::from(json!({"arr": [1, 2, 3], "keep": true}));
//! deep_merge(&mut target, &ConfigValue::from(json!({"arr": [100]})));
//! assert_eq!(target.to_json(), json!({"arr": [100, 2, 3], "keep": true}));
//! ```

use crate::value::{ConfigMap, ConfigValue};

/// Where an incoming value lands in the target container.
#[derive(Clone, Copy, Debug)]
enum Slot<'k> {
    Key(&'k str),
    Index(usize),
}

/// Merge every source into `target`, returning `target`.
///
/// A `target` that is not a container is first replaced by an empty mapping.
/// Null, absent and other non-container sources contribute nothing.
pub fn merge<'t, 's, I>(deep: bool, target: &'t mut ConfigValue, sources: I) -> &'t mut ConfigValue
where
    I: IntoIterator<Item = &'s ConfigValue>,
{
    if !target.is_container() {
        *target = ConfigValue::mapping();
    }
    for source in sources {
        merge_source(deep, target, source);
    }
    target
}

/// Recursively merge `source` into `target`.
pub fn deep_merge<'t>(target: &'t mut ConfigValue, source: &ConfigValue) -> &'t mut ConfigValue {
    merge(true, target, [source])
}

/// Copy the top-level entries of `source` into `target`.
pub fn shallow_merge<'t>(target: &'t mut ConfigValue, source: &ConfigValue) -> &'t mut ConfigValue {
    merge(false, target, [source])
}

/// Deep copy of a mapping or sequence built by merging it into an empty
/// container of the same shape.
///
/// Any other value yields [`ConfigValue::Absent`].
#[must_use]
pub fn clone_value(value: &ConfigValue) -> ConfigValue {
    copy_container(true, value).unwrap_or_default()
}

/// One-level copy of a mapping or sequence.
///
/// Nested containers are carried over whole; any other value is returned
/// unchanged.
#[must_use]
pub fn shallow_clone(value: &ConfigValue) -> ConfigValue {
    copy_container(false, value).unwrap_or_else(|| value.clone())
}

fn copy_container(deep: bool, value: &ConfigValue) -> Option<ConfigValue> {
    let mut fresh = match value {
        ConfigValue::Mapping(_) => ConfigValue::mapping(),
        ConfigValue::Sequence(_) => ConfigValue::sequence(),
        _ => return None,
    };
    merge_source(deep, &mut fresh, value);
    Some(fresh)
}

fn merge_source(deep: bool, target: &mut ConfigValue, source: &ConfigValue) {
    match source {
        ConfigValue::Mapping(entries) => {
            for (key, incoming) in entries {
                assign(deep, target, Slot::Key(key), incoming);
            }
        }
        ConfigValue::Sequence(items) => {
            for (index, incoming) in items.iter().enumerate() {
                assign(deep, target, Slot::Index(index), incoming);
            }
        }
        _ => {}
    }
}

fn assign(deep: bool, target: &mut ConfigValue, slot: Slot<'_>, incoming: &ConfigValue) {
    if incoming.is_absent() {
        return;
    }
    let Some(existing) = slot_mut(target, slot) else {
        return;
    };
    if deep && incoming.is_container() {
        let mut destination = match (incoming, std::mem::take(existing)) {
            (ConfigValue::Mapping(_), current @ ConfigValue::Mapping(_))
            | (ConfigValue::Sequence(_), current @ ConfigValue::Sequence(_)) => current,
            (ConfigValue::Sequence(_), _) => ConfigValue::sequence(),
            _ => ConfigValue::mapping(),
        };
        merge_source(deep, &mut destination, incoming);
        *existing = destination;
    } else {
        *existing = incoming.clone();
    }
}

/// Resolve `slot` inside `target`, creating it when missing.
///
/// Mappings address sequence positions by their decimal key. Sequences only
/// accept keys that are canonical indices no greater than their length, while
/// source indices pad with absent items up to the source's own length.
fn slot_mut<'t>(target: &'t mut ConfigValue, slot: Slot<'_>) -> Option<&'t mut ConfigValue> {
    match (target, slot) {
        (ConfigValue::Mapping(map), Slot::Key(key)) => Some(entry(map, key.to_owned())),
        (ConfigValue::Mapping(map), Slot::Index(index)) => Some(entry(map, index.to_string())),
        (ConfigValue::Sequence(items), Slot::Index(index)) => position(items, index),
        (ConfigValue::Sequence(items), Slot::Key(key)) => {
            canonical_index(key)
                .filter(|index| *index <= items.len())
                .and_then(|index| position(items, index))
        }
        _ => None,
    }
}

fn entry(map: &mut ConfigMap, key: String) -> &mut ConfigValue {
    map.entry(key).or_default()
}

fn position(items: &mut Vec<ConfigValue>, index: usize) -> Option<&mut ConfigValue> {
    if items.len() <= index {
        items.resize(index.saturating_add(1), ConfigValue::Absent);
    }
    items.get_mut(index)
}

fn canonical_index(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == key)
}
