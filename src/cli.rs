//! Clap adapter: inject a loaded config as argument defaults.
//!
//! This module is the **optional integration layer** between the
//! framework-agnostic loader chain and the [clap](https://docs.rs/clap)
//! parser. It is compiled only when the `clap` Cargo feature is enabled (on
//! by default).
//!
//! Clap has no eager per-parameter callback, so the bridge parses in two
//! phases: [`ConfigOption::try_get_matches_from`] first pre-scans the raw
//! argv for the config option's value, runs the loader chain on it, and
//! rewrites the command so that each top-level config key becomes the
//! default value of the identically named argument. Clap's normal
//! resolution then runs: explicit argv values override the injected
//! defaults, untouched arguments fall back to them, and anything the config
//! didn't mention keeps its hardcoded default.
//!
//! A loader failure aborts before the command body runs, surfacing a clap
//! `ValueValidation` error that names the option and preserves the
//! underlying message. Success is silent.

use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command};
use serde_json::Value;

use crate::format::Format;
use crate::loader::{Loader, LoaderTransformer, file_exists_or_warn};
use crate::sources::{FallbackResolver, MultiSourceMerger};
use crate::types::ConfigDict;

/// A `--config <FILE>` style option bound to a loader chain.
///
/// Construct with one of [`format`](Self::format),
/// [`format_default`](Self::format_default), [`multifile`](Self::multifile),
/// or [`fallback`](Self::fallback), or [`new`](Self::new) with any custom
/// [`Loader`], then hand your `Command` to
/// [`try_get_matches_from`](Self::try_get_matches_from).
pub struct ConfigOption {
    long: String,
    help: String,
    chain: Box<dyn Loader>,
}

impl ConfigOption {
    /// Bind an arbitrary loader chain to the config option.
    pub fn new(loader: impl Loader + 'static) -> Self {
        Self {
            long: "config".into(),
            help: "Configuration file.".into(),
            chain: Box::new(loader),
        }
    }

    /// One format; nothing is loaded unless the user passes a file.
    pub fn format(format: Format) -> Self {
        Self::new(LoaderTransformer::new(format).skip_empty())
    }

    /// One format with a default path used when the user passes nothing.
    ///
    /// The existence gate keeps an absent config file from aborting the
    /// command (or its `--help`): a missing path is warned about on stderr
    /// and skipped, leaving the CLI defaults in force.
    pub fn format_default(format: Format, default_path: impl Into<String>) -> Self {
        Self::new(
            LoaderTransformer::new(format)
                .default_path(default_path)
                .when(file_exists_or_warn),
        )
    }

    /// Merge a fixed list of default files; a user-passed file is merged
    /// last and so overrides them all.
    pub fn multifile(
        format: Format,
        default_files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(MultiSourceMerger::new(format, default_files))
    }

    /// Try a priority list of files and use the first that exists; a
    /// user-passed file is tried before any of them.
    pub fn fallback(
        format: Format,
        candidates: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(FallbackResolver::new(format, candidates))
    }

    /// Narrow the loaded config to a nested section before injection.
    pub fn section(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.chain = Box::new(LoaderTransformer::new(self.chain).section(keys));
        self
    }

    /// Rename the option (default: `config`).
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = name.into();
        self
    }

    /// Replace the option's help text.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    /// The option's argument id, e.g. for excluding it from a dump.
    pub fn id(&self) -> &str {
        &self.long
    }

    /// Add the string-typed config option to a command. An empty default
    /// means "no config file specified".
    pub fn attach(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new(self.long.clone())
                .long(self.long.clone())
                .value_name("FILE")
                .num_args(1)
                .default_value("")
                .hide_default_value(true)
                .help(self.help.clone()),
        )
    }

    /// Two-phase parse: load the config eagerly, inject defaults, then let
    /// clap resolve the full argv.
    pub fn try_get_matches_from(
        &self,
        cmd: Command,
        argv: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<ArgMatches, clap::Error> {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let mut cmd = self.attach(cmd);

        let raw = self.eager_value(&argv);
        match self.chain.load(&raw) {
            Ok(defaults) => cmd = apply_defaults(cmd, &defaults),
            Err(err) => {
                return Err(cmd.error(
                    ErrorKind::ValueValidation,
                    format!("invalid value for '--{}': {err}", self.long),
                ));
            }
        }

        cmd.try_get_matches_from(argv)
    }

    /// Like [`try_get_matches_from`](Self::try_get_matches_from) over
    /// `std::env::args()`, exiting on error the way clap does.
    pub fn get_matches(&self, cmd: Command) -> ArgMatches {
        self.try_get_matches_from(cmd, std::env::args())
            .unwrap_or_else(|err| err.exit())
    }

    /// Pre-scan argv for the option's value, before clap parses anything.
    ///
    /// Handles `--config value` and `--config=value`; the last occurrence
    /// wins, and everything after a bare `--` is left alone. Returns the
    /// empty string when the option was not passed. A candidate value that
    /// looks like a flag is not consumed, so a dangling `--config` falls
    /// through to clap's own missing-value diagnostic.
    fn eager_value(&self, argv: &[String]) -> String {
        let flag = format!("--{}", self.long);
        let prefix = format!("--{}=", self.long);
        let mut value = String::new();
        let mut args = argv.iter().peekable();
        while let Some(arg) = args.next() {
            let arg = arg.as_str();
            if arg == "--" {
                break;
            }
            if let Some(v) = arg.strip_prefix(&prefix) {
                value = v.to_string();
            } else if arg == flag
                && let Some(v) = args.peek()
                && !v.starts_with('-')
            {
                value = (*v).clone();
                args.next();
            }
        }
        value
    }
}

/// Set each top-level config key as the default value of the identically
/// named argument. Keys with no matching argument, and nested mappings
/// (which have no scalar argument to bind to), are ignored.
pub fn apply_defaults(mut cmd: Command, defaults: &ConfigDict) -> Command {
    let ids: Vec<String> = cmd
        .get_arguments()
        .map(|arg| arg.get_id().to_string())
        .collect();

    for (key, value) in defaults {
        if !ids.iter().any(|id| id == key) {
            continue;
        }
        match value {
            Value::Array(items) => {
                let Some(values) = items
                    .iter()
                    .map(scalar_to_string)
                    .collect::<Option<Vec<String>>>()
                else {
                    continue;
                };
                cmd = cmd.mut_arg(key.as_str(), |arg| arg.default_values(values));
            }
            scalar => {
                let Some(value) = scalar_to_string(scalar) else {
                    continue;
                };
                cmd = cmd.mut_arg(key.as_str(), |arg| arg.default_value(value));
            }
        }
    }
    cmd
}

/// Render a scalar config value the way it would be typed on the command
/// line. Mappings and nulls have no CLI spelling.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Collect the final resolved argument values into a [`ConfigDict`] for the
/// dump path. Values are recorded as the strings clap resolved (defaults
/// included); multi-value arguments become sequences. Pass the config
/// option's id in `exclude` to keep it out of the dump.
pub fn values_from_matches(matches: &ArgMatches, exclude: &[&str]) -> ConfigDict {
    let mut dict = ConfigDict::new();
    for id in matches.ids() {
        let name = id.as_str();
        if exclude.contains(&name) {
            continue;
        }
        let Ok(Some(raw)) = matches.try_get_raw(name) else {
            continue;
        };
        let mut values: Vec<String> = raw
            .map(|os| os.to_string_lossy().into_owned())
            .collect();
        let value = match values.len() {
            0 => continue,
            1 => Value::String(values.remove(0)),
            _ => Value::Array(values.into_iter().map(Value::String).collect()),
        };
        dict.insert(name.to_string(), value);
    }
    dict
}
