//! Multi-source resolution: merge an ordered list of config files, or pick
//! the first one that exists.
//!
//! Both types hold a fixed source list plus a base loader and also implement
//! [`Loader`] themselves, so they slot into the same CLI bridge as a single
//! format. As loaders they fold the raw `--config` value into the list:
//!
//! - [`MultiSourceMerger`] appends it **after** the fixed sources, so an
//!   explicitly passed file overrides the defaults;
//! - [`FallbackResolver`] tries it **first**, so an explicitly passed file
//!   beats every fallback candidate.
//!
//! Empty-string entries stand for "no source here" and are skipped without
//! ever being an error.

use std::path::Path;

use crate::error::ClapconfError;
use crate::loader::Loader;
use crate::merge::merge;
use crate::types::{ConfigDict, MergePolicy};

/// Loads every existing source in order and merges them into one dict,
/// later sources overriding earlier ones.
pub struct MultiSourceMerger<L> {
    sources: Vec<String>,
    base: L,
    policy: MergePolicy,
    skip_missing: bool,
}

impl<L: Loader> MultiSourceMerger<L> {
    /// Deep merge and silent skipping of missing sources by default.
    pub fn new(base: L, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            base,
            policy: MergePolicy::Deep,
            skip_missing: true,
        }
    }

    pub fn policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// When disabled, a missing source aborts the whole merge with
    /// [`ClapconfError::FileNotFound`]. Empty entries are still skipped.
    pub fn skip_missing(mut self, skip: bool) -> Self {
        self.skip_missing = skip;
        self
    }

    /// Merge the fixed source list, without any CLI-provided extra.
    pub fn resolve(&self) -> Result<ConfigDict, ClapconfError> {
        self.merge_all(self.sources.iter().map(String::as_str))
    }

    fn merge_all<'a>(
        &self,
        sources: impl Iterator<Item = &'a str>,
    ) -> Result<ConfigDict, ClapconfError> {
        let mut acc = ConfigDict::new();
        for source in sources {
            if source.is_empty() {
                continue;
            }
            if !Path::new(source).is_file() {
                if self.skip_missing {
                    continue;
                }
                return Err(ClapconfError::FileNotFound {
                    path: source.into(),
                });
            }
            let overlay = self.base.load(source)?;
            acc = merge(acc, overlay, self.policy);
        }
        Ok(acc)
    }
}

impl<L: Loader> Loader for MultiSourceMerger<L> {
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError> {
        self.merge_all(
            self.sources
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(raw)),
        )
    }
}

/// Picks the first existing candidate and loads only that one. No merging.
///
/// Finding no candidate at all returns the empty dict; that is the
/// documented way to let CLI defaults take over.
pub struct FallbackResolver<L> {
    candidates: Vec<String>,
    base: L,
}

impl<L: Loader> FallbackResolver<L> {
    pub fn new(base: L, candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            base,
        }
    }

    /// Resolve against the fixed candidate list only.
    pub fn resolve(&self) -> Result<ConfigDict, ClapconfError> {
        self.first_existing(self.candidates.iter().map(String::as_str))
    }

    fn first_existing<'a>(
        &self,
        candidates: impl Iterator<Item = &'a str>,
    ) -> Result<ConfigDict, ClapconfError> {
        for candidate in candidates {
            if candidate.is_empty() {
                continue;
            }
            if Path::new(candidate).is_file() {
                return self.base.load(candidate);
            }
        }
        Ok(ConfigDict::new())
    }
}

impl<L: Loader> Loader for FallbackResolver<L> {
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError> {
        self.first_existing(
            std::iter::once(raw).chain(self.candidates.iter().map(String::as_str)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{dict, write};
    use crate::format::Format;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn path_str(path: &std::path::Path) -> String {
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn later_sources_override_earlier() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.json", r#"{"opt1": "things", "opt2": "nothing"}"#);
        let b = write(&dir, "b.json", r#"{"opt1": "foo"}"#);

        let merger = MultiSourceMerger::new(Format::Json, [path_str(&a), path_str(&b)]);
        let result = merger.resolve().unwrap();
        assert_eq!(result["opt1"], json!("foo"));
        assert_eq!(result["opt2"], json!("nothing"));
    }

    #[test]
    fn deep_policy_merges_nested_dicts() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "base.json",
            r#"{"database": {"host": "localhost", "port": 5432,
                "credentials": {"username": "admin", "password": "old"}}}"#,
        );
        let over = write(
            &dir,
            "over.json",
            r#"{"database": {"host": "production.db.example.com",
                "credentials": {"password": "supersecret"}}}"#,
        );

        let merger = MultiSourceMerger::new(Format::Json, [path_str(&base), path_str(&over)]);
        let result = merger.resolve().unwrap();
        let db = &result["database"];
        assert_eq!(db["host"], json!("production.db.example.com"));
        assert_eq!(db["port"], json!(5432));
        assert_eq!(db["credentials"]["username"], json!("admin"));
        assert_eq!(db["credentials"]["password"], json!("supersecret"));
    }

    #[test]
    fn shallow_policy_replaces_whole_subtrees() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "base.json",
            r#"{"database": {"host": "localhost", "port": 5432}}"#,
        );
        let over = write(&dir, "over.json", r#"{"database": {"host": "prod"}}"#);

        let merger = MultiSourceMerger::new(Format::Json, [path_str(&base), path_str(&over)])
            .policy(MergePolicy::Shallow);
        let result = merger.resolve().unwrap();
        assert_eq!(result["database"]["host"], json!("prod"));
        assert!(result["database"].get("port").is_none());
    }

    #[test]
    fn missing_sources_are_skipped_without_reordering() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.json", r#"{"opt1": "a", "only_a": 1}"#);
        let b = write(&dir, "b.json", r#"{"opt1": "b"}"#);
        let missing = path_str(&dir.path().join("missing.json"));

        let with_gap =
            MultiSourceMerger::new(Format::Json, [path_str(&a), missing, path_str(&b)])
                .resolve()
                .unwrap();
        let without_gap = MultiSourceMerger::new(Format::Json, [path_str(&a), path_str(&b)])
            .resolve()
            .unwrap();
        assert_eq!(with_gap, without_gap);
        assert_eq!(with_gap["opt1"], json!("b"));
    }

    #[test]
    fn skip_missing_false_raises() {
        let dir = TempDir::new().unwrap();
        let missing = path_str(&dir.path().join("missing.json"));

        let err = MultiSourceMerger::new(Format::Json, [missing.clone()])
            .skip_missing(false)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ClapconfError::FileNotFound { .. }));
        assert!(err.to_string().contains(&missing));
    }

    #[test]
    fn skip_missing_default_returns_empty() {
        let dir = TempDir::new().unwrap();
        let missing = path_str(&dir.path().join("missing.json"));
        let result = MultiSourceMerger::new(Format::Json, [missing])
            .resolve()
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn empty_source_list_never_invokes_loader() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let base = move |_: &str| {
            seen.set(seen.get() + 1);
            Ok(ConfigDict::new())
        };
        let merger = MultiSourceMerger::new(base, Vec::<String>::new());
        assert!(merger.resolve().unwrap().is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_entries_skipped_even_when_strict() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.json", r#"{"opt1": "things"}"#);

        let result = MultiSourceMerger::new(Format::Json, ["".to_string(), path_str(&a), "".to_string()])
            .skip_missing(false)
            .resolve()
            .unwrap();
        assert_eq!(result["opt1"], json!("things"));
    }

    #[test]
    fn as_loader_the_raw_value_overrides_fixed_sources() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.json", r#"{"opt1": "things", "opt2": "nothing"}"#);
        let b = write(&dir, "b.json", r#"{"opt1": "foo"}"#);

        let merger = MultiSourceMerger::new(Format::Json, [path_str(&a)]);
        let result = merger.load(&path_str(&b)).unwrap();
        assert_eq!(result["opt1"], json!("foo"));
        assert_eq!(result["opt2"], json!("nothing"));
    }

    #[test]
    fn as_loader_empty_raw_value_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.json", r#"{"opt1": "things"}"#);

        let merger = MultiSourceMerger::new(Format::Json, [path_str(&a)]);
        assert_eq!(merger.load("").unwrap(), merger.resolve().unwrap());
    }

    // --- FallbackResolver ---

    #[test]
    fn first_existing_wins_and_short_circuits() {
        let dir = TempDir::new().unwrap();
        let x = write(&dir, "x.json", r#"{"from": "x"}"#);
        let y = write(&dir, "y.json", r#"{"from": "y"}"#);
        let missing = path_str(&dir.path().join("missing.json"));

        let loads = Rc::new(Cell::new(0));
        let seen = loads.clone();
        let base = move |raw: &str| {
            seen.set(seen.get() + 1);
            Format::Json.load(raw)
        };

        let resolver = FallbackResolver::new(base, [missing, path_str(&x), path_str(&y)]);
        let result = resolver.resolve().unwrap();
        assert_eq!(result["from"], json!("x"));
        // y.json exists but must never be touched.
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn no_existing_candidate_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let resolver = FallbackResolver::new(
            Format::Json,
            [
                path_str(&dir.path().join("one.json")),
                path_str(&dir.path().join("two.json")),
            ],
        );
        assert!(resolver.resolve().unwrap().is_empty());
    }

    #[test]
    fn empty_candidate_list_returns_empty() {
        let resolver = FallbackResolver::new(Format::Json, Vec::<String>::new());
        assert!(resolver.resolve().unwrap().is_empty());
    }

    #[test]
    fn as_loader_the_raw_value_is_tried_first() {
        let dir = TempDir::new().unwrap();
        let fallback = write(&dir, "fallback.json", r#"{"from": "fallback"}"#);
        let explicit = write(&dir, "explicit.json", r#"{"from": "explicit"}"#);

        let resolver = FallbackResolver::new(Format::Json, [path_str(&fallback)]);
        let result = resolver.load(&path_str(&explicit)).unwrap();
        assert_eq!(result["from"], json!("explicit"));
    }

    #[test]
    fn as_loader_empty_raw_value_falls_through() {
        let dir = TempDir::new().unwrap();
        let fallback = write(&dir, "fallback.json", r#"{"from": "fallback"}"#);

        let resolver = FallbackResolver::new(Format::Json, [path_str(&fallback)]);
        let result = resolver.load("").unwrap();
        assert_eq!(result["from"], json!("fallback"));
    }

    #[test]
    fn fallback_composes_with_section_extraction() {
        use crate::loader::LoaderTransformer;

        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "app.json",
            r#"{"simple_app": {"opt1": "things2"}, "other": 1}"#,
        );

        let chain = LoaderTransformer::new(FallbackResolver::new(Format::Json, [path_str(&file)]))
            .section(["simple_app"]);
        let result = chain.load("").unwrap();
        assert_eq!(result, dict(json!({"opt1": "things2"})));
    }

    #[test]
    fn parse_errors_are_never_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.json", r#"{"opt1": "things"}"#);
        let bad = write(&dir, "bad.json", "{nope");

        let merger = MultiSourceMerger::new(Format::Json, [path_str(&good), path_str(&bad)]);
        let err = merger.resolve().unwrap_err();
        assert!(matches!(err, ClapconfError::Parse { .. }));
    }
}
