use serde_json::Value;

use crate::types::{ConfigDict, MergePolicy};

/// Merge `overlay` on top of `base` under the given policy.
pub fn merge(base: ConfigDict, overlay: ConfigDict, policy: MergePolicy) -> ConfigDict {
    match policy {
        MergePolicy::Deep => deep_merge(base, overlay),
        MergePolicy::Shallow => shallow_merge(base, overlay),
    }
}

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: ConfigDict, overlay: ConfigDict) -> ConfigDict {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                base.insert(key, Value::Object(deep_merge(base_map, overlay_map)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Shallow-merge: every overlay value replaces the base value wholesale.
/// Nested mappings are swapped entirely, not combined.
pub fn shallow_merge(mut base: ConfigDict, overlay: ConfigDict) -> ConfigDict {
    for (key, overlay_val) in overlay {
        base.insert(key, overlay_val);
    }
    base
}
