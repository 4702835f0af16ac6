//! The loader contract and composition.
//!
//! A [`Loader`] maps a raw CLI value (typically a file path) to a
//! [`ConfigDict`]. [`Format`] is the primitive loader; [`LoaderTransformer`]
//! wraps any loader with up to three hooks, applied in a fixed order:
//!
//! 1. **input transform**: rewrite the raw value (e.g. substitute a default
//!    path when the user passed nothing);
//! 2. **precondition**: evaluated against the transformed value; when it
//!    fails the base loader is never invoked and the empty dict stands in.
//!    This is what keeps `--help` working when a default config path does
//!    not exist;
//! 3. **base load**, then **output transform**: typically section
//!    extraction. The output transform also runs over the empty dict, so
//!    narrowing "no data" yields "no data" rather than an error.

use std::path::Path;

use crate::error::ClapconfError;
use crate::format::Format;
use crate::types::{ConfigDict, get_section};

/// Anything that turns a raw parameter value into a [`ConfigDict`].
pub trait Loader {
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError>;
}

/// Plain functions and closures are loaders.
impl<F> Loader for F
where
    F: Fn(&str) -> Result<ConfigDict, ClapconfError>,
{
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError> {
        self(raw)
    }
}

/// A format is the primitive loader: the raw value is the file path.
impl Loader for Format {
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError> {
        Format::load(*self, raw)
    }
}

impl Loader for Box<dyn Loader> {
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError> {
        (**self).load(raw)
    }
}

/// Wraps a base loader with optional precondition, input, and output hooks.
///
/// Built with [`LoaderTransformer::new`] and the chainable setters. Without
/// any hooks it behaves exactly like the base loader. The default is to
/// always proceed; install [`skip_empty`](Self::skip_empty) (or a custom
/// [`when`](Self::when) gate) to skip loading for values that should not be
/// treated as paths.
pub struct LoaderTransformer<L> {
    base: L,
    precondition: Option<Box<dyn Fn(&str) -> bool>>,
    input_transform: Option<Box<dyn Fn(&str) -> String>>,
    output_transform: Option<Box<dyn Fn(ConfigDict) -> ConfigDict>>,
}

impl<L: Loader> LoaderTransformer<L> {
    pub fn new(base: L) -> Self {
        Self {
            base,
            precondition: None,
            input_transform: None,
            output_transform: None,
        }
    }

    /// Gate loading on a predicate over the (transformed) raw value.
    pub fn when(mut self, pred: impl Fn(&str) -> bool + 'static) -> Self {
        self.precondition = Some(Box::new(pred));
        self
    }

    /// Skip loading when the raw value is empty ("no config file given").
    pub fn skip_empty(self) -> Self {
        self.when(|raw| !raw.is_empty())
    }

    /// Rewrite the raw value before the precondition and the base loader see it.
    pub fn map_input(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.input_transform = Some(Box::new(f));
        self
    }

    /// Substitute `path` when the user passed an empty value.
    pub fn default_path(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.map_input(move |raw| {
            if raw.is_empty() {
                path.clone()
            } else {
                raw.to_string()
            }
        })
    }

    /// Transform the loaded dict before returning it.
    pub fn map_output(mut self, f: impl Fn(ConfigDict) -> ConfigDict + 'static) -> Self {
        self.output_transform = Some(Box::new(f));
        self
    }

    /// Narrow the result to a nested section.
    pub fn section(self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.map_output(move |dict| get_section(dict, &keys))
    }
}

impl<L: Loader> Loader for LoaderTransformer<L> {
    fn load(&self, raw: &str) -> Result<ConfigDict, ClapconfError> {
        let value = match &self.input_transform {
            Some(f) => f(raw),
            None => raw.to_string(),
        };
        let proceed = self.precondition.as_ref().is_none_or(|pred| pred(&value));
        let dict = if proceed {
            self.base.load(&value)?
        } else {
            ConfigDict::new()
        };
        Ok(match &self.output_transform {
            Some(f) => f(dict),
            None => dict,
        })
    }
}

/// Canned precondition: does the file exist? Warns on stderr when it
/// doesn't, so a skipped default path leaves a trace.
pub fn file_exists_or_warn(path: &str) -> bool {
    let exists = Path::new(path).is_file();
    if !exists {
        eprintln!("warning: No such file: '{path}'");
    }
    exists
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::rc::Rc;

    fn dict(v: serde_json::Value) -> ConfigDict {
        match v {
            Value::Object(m) => m,
            other => panic!("fixture must be an object, got {other:?}"),
        }
    }

    /// Loader that records how often it ran and what it was asked to load.
    fn counting_loader(
        result: ConfigDict,
    ) -> (impl Fn(&str) -> Result<ConfigDict, ClapconfError>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let loader = move |_raw: &str| {
            seen.set(seen.get() + 1);
            Ok(result.clone())
        };
        (loader, calls)
    }

    #[test]
    fn no_hooks_is_the_base_loader() {
        let (base, calls) = counting_loader(dict(json!({"x": 1})));
        let transformer = LoaderTransformer::new(base);
        let result = transformer.load("anything").unwrap();
        assert_eq!(result["x"], json!(1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failed_precondition_skips_base_and_returns_empty() {
        let (base, calls) = counting_loader(dict(json!({"x": 1})));
        let transformer = LoaderTransformer::new(base).skip_empty();
        let result = transformer.load("").unwrap();
        assert!(result.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn precondition_false_wins_over_default_path() {
        // Even when the substituted default would load fine, a failing
        // precondition means the base loader never runs.
        let (base, calls) = counting_loader(dict(json!({"x": 1})));
        let transformer = LoaderTransformer::new(base)
            .default_path("/etc/app/config.yml")
            .when(|_| false);
        let result = transformer.load("").unwrap();
        assert!(result.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn precondition_sees_transformed_value() {
        let (base, calls) = counting_loader(dict(json!({"x": 1})));
        let transformer = LoaderTransformer::new(base)
            .default_path("substituted.yml")
            .when(|value| value == "substituted.yml");
        transformer.load("").unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn input_transform_rewrites_the_path() {
        let seen_path = Rc::new(std::cell::RefCell::new(String::new()));
        let record = seen_path.clone();
        let base = move |raw: &str| {
            *record.borrow_mut() = raw.to_string();
            Ok(ConfigDict::new())
        };
        let transformer = LoaderTransformer::new(base).default_path("fallback.yml");

        transformer.load("explicit.yml").unwrap();
        assert_eq!(*seen_path.borrow(), "explicit.yml");

        transformer.load("").unwrap();
        assert_eq!(*seen_path.borrow(), "fallback.yml");
    }

    #[test]
    fn output_transform_extracts_section() {
        let base = |_: &str| Ok(dict(json!({"tool": {"app": {"opt1": "things"}}})));
        let transformer = LoaderTransformer::new(base).section(["tool", "app"]);
        let result = transformer.load("x").unwrap();
        assert_eq!(result["opt1"], json!("things"));
    }

    #[test]
    fn output_transform_runs_on_empty_dict() {
        let (base, calls) = counting_loader(dict(json!({"x": 1})));
        let transformer = LoaderTransformer::new(base).skip_empty().section(["app"]);
        let result = transformer.load("").unwrap();
        assert!(result.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn base_errors_propagate_unchanged() {
        let base = |_: &str| {
            Err(ClapconfError::FileNotFound {
                path: "gone.yml".into(),
            })
        };
        let transformer = LoaderTransformer::new(base).when(|_| true);
        let err = transformer.load("gone.yml").unwrap_err();
        assert_eq!(err.to_string(), "No such file: 'gone.yml'");
    }

    #[test]
    fn transformers_compose_through_boxing() {
        let base = |_: &str| Ok(dict(json!({"app": {"opt1": "things"}})));
        let inner: Box<dyn Loader> = Box::new(LoaderTransformer::new(base));
        let outer = LoaderTransformer::new(inner).section(["app"]);
        let result = outer.load("x").unwrap();
        assert_eq!(result["opt1"], json!("things"));
    }

    #[test]
    fn file_exists_or_warn_checks_the_filesystem() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("present.yml");
        std::fs::write(&path, "a: 1\n").unwrap();
        assert!(file_exists_or_warn(path.to_str().unwrap()));
        assert!(!file_exists_or_warn(
            dir.path().join("absent.yml").to_str().unwrap()
        ));
    }
}
