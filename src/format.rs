//! Config file formats and their loaders.
//!
//! Every format maps a file path to a [`ConfigDict`]. YAML, JSON, and TOML
//! documents must have a mapping at top level. INI output is namespaced one
//! level by `[section]`; dotenv yields a flat string-to-string map.
//!
//! JSON and TOML are always compiled in. YAML, INI, and dotenv backends sit
//! behind the `yaml`, `ini`, and `dotenv` Cargo features (on by default);
//! loading a format whose backend is disabled fails with
//! [`ClapconfError::MissingBackend`] before any file I/O happens.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::ClapconfError;
use crate::types::ConfigDict;

/// A supported configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
    Ini,
    Dotenv,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Yaml => "YAML",
            Format::Json => "JSON",
            Format::Toml => "TOML",
            Format::Ini => "INI",
            Format::Dotenv => "dotenv",
        };
        write!(f, "{name}")
    }
}

impl Format {
    /// Guess the format from a file name.
    ///
    /// Matches on the lowercased extension, plus the conventional `.env`
    /// file name which has no extension at all.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Format> {
        let path = path.as_ref();
        if path
            .file_name()
            .is_some_and(|n| n.to_str().is_some_and(|n| n == ".env" || n.starts_with(".env.")))
        {
            return Some(Format::Dotenv);
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "ini" | "cfg" => Some(Format::Ini),
            "env" => Some(Format::Dotenv),
            _ => None,
        }
    }

    /// Load and parse a file in this format.
    pub fn load(self, path: impl AsRef<Path>) -> Result<ConfigDict, ClapconfError> {
        let path = path.as_ref();
        if !self.available() {
            return Err(ClapconfError::MissingBackend {
                format: self,
                feature: self.feature_gate(),
            });
        }
        let content = read_file(path)?;
        self.parse(path, &content)
    }

    /// Whether this format's parser is compiled in.
    pub fn available(self) -> bool {
        match self {
            Format::Json | Format::Toml => true,
            Format::Yaml => cfg!(feature = "yaml"),
            Format::Ini => cfg!(feature = "ini"),
            Format::Dotenv => cfg!(feature = "dotenv"),
        }
    }

    pub(crate) fn feature_gate(self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Ini => "ini",
            Format::Dotenv => "dotenv",
            // Always compiled in; never reported as missing.
            Format::Json | Format::Toml => "",
        }
    }

    fn parse(self, path: &Path, content: &str) -> Result<ConfigDict, ClapconfError> {
        match self {
            Format::Json => parse_json(path, content),
            Format::Toml => parse_toml(path, content),
            #[cfg(feature = "yaml")]
            Format::Yaml => parse_yaml(path, content),
            #[cfg(feature = "ini")]
            Format::Ini => parse_ini(path, content),
            #[cfg(feature = "dotenv")]
            Format::Dotenv => parse_dotenv(path, content),
            #[allow(unreachable_patterns)]
            disabled => Err(ClapconfError::MissingBackend {
                format: disabled,
                feature: disabled.feature_gate(),
            }),
        }
    }
}

/// Read a file, mapping "not found" to the dedicated error variant.
pub(crate) fn read_file(path: &Path) -> Result<String, ClapconfError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ClapconfError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ClapconfError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn require_mapping(path: &Path, format: Format, value: Value) -> Result<ConfigDict, ClapconfError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClapconfError::Parse {
            path: path.to_path_buf(),
            format,
            message: format!("top level must be a mapping, got {}", value_kind(&other)),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn parse_json(path: &Path, content: &str) -> Result<ConfigDict, ClapconfError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ClapconfError::Parse {
        path: path.to_path_buf(),
        format: Format::Json,
        message: e.to_string(),
    })?;
    require_mapping(path, Format::Json, value)
}

fn parse_toml(path: &Path, content: &str) -> Result<ConfigDict, ClapconfError> {
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
        ClapconfError::Parse {
            path: path.to_path_buf(),
            format: Format::Toml,
            message: e.to_string(),
        }
    })?;
    let value = serde_json::to_value(&table).map_err(|e| ClapconfError::Parse {
        path: path.to_path_buf(),
        format: Format::Toml,
        message: e.to_string(),
    })?;
    require_mapping(path, Format::Toml, value)
}

#[cfg(feature = "yaml")]
fn parse_yaml(path: &Path, content: &str) -> Result<ConfigDict, ClapconfError> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| ClapconfError::Parse {
        path: path.to_path_buf(),
        format: Format::Yaml,
        message: e.to_string(),
    })?;
    // An empty YAML document is an empty config, not an error.
    if value.is_null() {
        return Ok(ConfigDict::new());
    }
    require_mapping(path, Format::Yaml, value)
}

#[cfg(feature = "ini")]
fn parse_ini(path: &Path, content: &str) -> Result<ConfigDict, ClapconfError> {
    let mut ini = configparser::ini::Ini::new_cs();
    let sections = ini
        .read(content.to_string())
        .map_err(|message| ClapconfError::Parse {
            path: path.to_path_buf(),
            format: Format::Ini,
            message,
        })?;

    // One top-level key per [section], each a flat string-to-string map.
    let mut dict = ConfigDict::new();
    for (section, pairs) in sections {
        let mut inner = ConfigDict::new();
        for (key, value) in pairs {
            let value = match value {
                Some(v) => Value::String(v),
                None => Value::Null,
            };
            inner.insert(key, value);
        }
        dict.insert(section, Value::Object(inner));
    }
    Ok(dict)
}

#[cfg(feature = "dotenv")]
fn parse_dotenv(path: &Path, content: &str) -> Result<ConfigDict, ClapconfError> {
    let mut dict = ConfigDict::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) = item.map_err(|e| ClapconfError::Parse {
            path: path.to_path_buf(),
            format: Format::Dotenv,
            message: e.to_string(),
        })?;
        dict.insert(key, Value::String(value));
    }
    Ok(dict)
}
