use serde_json::Value;

/// A loaded configuration: string keys to arbitrary values, possibly nested.
///
/// Every loader in this crate produces one of these. Absence of data is the
/// empty map, never an error or a null.
pub type ConfigDict = serde_json::Map<String, Value>;

/// How two dicts combine when a key exists in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Nested mappings at matching keys are combined key-by-key.
    #[default]
    Deep,
    /// The later value replaces the earlier one wholesale, nested or not.
    Shallow,
}

/// Navigate into a nested [`ConfigDict`] via successive key lookups.
///
/// A missing key, or a non-mapping value, at any step yields the empty dict.
/// Extracting a section from `{}` is therefore `{}`, never an error.
pub fn get_section(mut dict: ConfigDict, keys: &[String]) -> ConfigDict {
    for key in keys {
        dict = match dict.remove(key) {
            Some(Value::Object(inner)) => inner,
            _ => ConfigDict::new(),
        };
    }
    dict
}
