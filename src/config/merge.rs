//! Recursive merge and dotted-path access over JSON config trees

use serde_json::{Map, Value};

/// Merge `overlay` into `base`. Objects merge key by key; anything else
/// (scalars, arrays, null) replaces the base value outright.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Look up `a.b.c` through nested objects
pub fn lookup<'a>(root: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(root, |current, key| current.as_object()?.get(key))
}

/// Assign `a.b.c = value`, creating missing intermediate objects.
/// Returns false when a key segment is empty or an intermediate is not an object.
pub fn assign(root: &mut Value, dotted: &str, value: Value) -> bool {
    let keys: Vec<&str> = dotted.split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        return false;
    }
    let Some((last, parents)) = keys.split_last() else {
        return false;
    };

    let mut current = root;
    for key in parents {
        let Value::Object(map) = current else {
            return false;
        };
        current = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            true
        }
        _ => false,
    }
}
