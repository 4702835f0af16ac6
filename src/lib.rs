//! File-backed defaults for clap CLI apps: point a command at a config file
//! and its contents become the default values of your arguments.
//!
//! ```ignore
//! let matches = ConfigOption::format(Format::Yaml)
//!     .get_matches(command);
//! ```
//!
//! That single call adds a `--config <FILE>` option to the command, loads
//! the file the user names, and injects each top-level key as the default
//! of the identically named argument. Explicit command-line values always
//! win; anything the file doesn't mention keeps its hardcoded default.
//!
//! # Why clapconf
//!
//! Most CLI tools eventually grow a config file, and the plumbing is always
//! the same: parse the file, thread its values past clap's defaults, make
//! sure explicit flags still override, don't break `--help` when the file
//! is missing. Clapconf is that plumbing, once, for five file formats.
//!
//! # Loading model
//!
//! Everything is built from one contract: a [`Loader`] maps a raw parameter
//! value (the `--config` string) to a [`ConfigDict`], a string-keyed map
//! of values, possibly nested. Absence of data is the empty dict, never an
//! error. Three composable pieces implement it:
//!
//! - **[`Format`]**: the primitive loaders. YAML, JSON, TOML, INI, and
//!   dotenv files each map to one dict. INI output is namespaced one level
//!   by `[section]`; dotenv is a flat string-to-string map.
//! - **[`LoaderTransformer`]**: wraps any loader with an input transform
//!   (e.g. substitute a default path), a precondition (skip loading
//!   entirely; this is what keeps `--help` alive when no config exists),
//!   and an output transform (typically section extraction).
//! - **[`MultiSourceMerger`] / [`FallbackResolver`]**: resolve an ordered
//!   list of files. The merger loads every existing source and combines
//!   them, later files overriding earlier ones, either key-by-key
//!   ([`MergePolicy::Deep`]) or by whole-subtree replacement
//!   ([`MergePolicy::Shallow`]). The resolver instead picks the first file
//!   that exists and loads only that one.
//!
//! Missing files in a multi-source or fallback list are silently skipped
//! (opt out with [`MultiSourceMerger::skip_missing`]); a file that exists
//! but doesn't parse is always fatal. A missing file named explicitly via
//! `--config` is fatal too.
//!
//! # Clap bridge
//!
//! Clap has no eager per-parameter callback, so [`ConfigOption`] parses in
//! two phases: it pre-scans argv for the config option's value, runs the
//! loader chain, rewrites the command's defaults, and only then lets clap
//! resolve the full argv. Loader errors become a clap `ValueValidation`
//! error naming the option and carrying the original message, and the
//! command aborts before its body runs.
//!
//! The convenience constructors cover the common shapes:
//!
//! - [`ConfigOption::format`]: one format, load only what the user passes;
//! - [`ConfigOption::format_default`]: same, with a default path when the
//!   user passes nothing (missing default is warned about and skipped);
//! - [`ConfigOption::multifile`]: merge a fixed list of default files,
//!   with the user's file merged last;
//! - [`ConfigOption::fallback`]: try a priority list, first existing wins,
//!   with the user's file tried first.
//!
//! All of them accept [`section`](ConfigOption::section) to narrow the
//! loaded dict to a nested section before injection.
//!
//! # Dumping
//!
//! The inverse path: [`values_from_matches`] collects the final resolved
//! argument values into a [`ConfigDict`], and [`dump`] writes any
//! serializable value to a JSON, YAML, or TOML file.
//!
//! # Cargo features
//!
//! JSON and TOML are always available. The `yaml`, `ini`, and `dotenv`
//! backends, and the `clap` bridge itself, are features (all on by
//! default); loading a format whose backend is compiled out fails with
//! [`ClapconfError::MissingBackend`]. To use the loader core with a
//! different argument parser:
//!
//! ```toml
//! clapconf = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`ClapconfError`]. Messages are
//! user-facing: a missing file reads `No such file: '...'`, parse errors
//! name the file and format, and the clap bridge passes them through
//! verbatim. Successful resolution is silent.

pub mod error;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod dump;
mod format;
mod loader;
mod merge;
mod sources;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{ConfigOption, apply_defaults, values_from_matches};
pub use dump::dump;
pub use error::ClapconfError;
pub use format::Format;
pub use loader::{Loader, LoaderTransformer, file_exists_or_warn};
pub use merge::{deep_merge, merge, shallow_merge};
pub use sources::{FallbackResolver, MultiSourceMerger};
pub use types::{ConfigDict, MergePolicy, get_section};
