#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::PathBuf;

    use serde_json::Value;
    use tempfile::TempDir;

    use crate::types::ConfigDict;

    /// Write a config file into a temp dir and return its path.
    pub fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Build a `ConfigDict` from a `json!` literal.
    pub fn dict(value: Value) -> ConfigDict {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other:?}"),
        }
    }

    #[test]
    fn dict_accepts_objects() {
        let d = dict(serde_json::json!({"a": 1}));
        assert_eq!(d["a"], serde_json::json!(1));
    }
}
