//! The inverse operation: write resolved values back out to a config file.
//!
//! JSON, YAML, and TOML can be dumped; INI and dotenv are load-only. A dump
//! is a single synchronous write, creating parent directories as needed.

use std::path::Path;

use serde::Serialize;

use crate::error::ClapconfError;
use crate::format::Format;

/// Serialize `value` in the given format and write it to `path`.
///
/// Accepts anything serializable, typically a
/// [`ConfigDict`](crate::types::ConfigDict) built by
/// [`values_from_matches`](crate::values_from_matches), or the
/// application's own settings struct.
pub fn dump<T: Serialize>(
    value: &T,
    format: Format,
    path: impl AsRef<Path>,
) -> Result<(), ClapconfError> {
    let path = path.as_ref();
    let content = serialize(value, format)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ClapconfError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| ClapconfError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn serialize<T: Serialize>(value: &T, format: Format) -> Result<String, ClapconfError> {
    match format {
        Format::Json => serde_json::to_string_pretty(value).map_err(|e| ClapconfError::SerializeError {
            format: Format::Json,
            message: e.to_string(),
        }),
        Format::Toml => toml::to_string_pretty(value).map_err(|e| ClapconfError::SerializeError {
            format: Format::Toml,
            message: e.to_string(),
        }),
        #[cfg(feature = "yaml")]
        Format::Yaml => serde_yaml::to_string(value).map_err(|e| ClapconfError::SerializeError {
            format: Format::Yaml,
            message: e.to_string(),
        }),
        Format::Ini | Format::Dotenv => Err(ClapconfError::DumpUnsupported { format }),
        #[allow(unreachable_patterns)]
        disabled => Err(ClapconfError::MissingBackend {
            format: disabled,
            feature: disabled.feature_gate(),
        }),
    }
}
