use std::path::PathBuf;
use thiserror::Error;

use crate::format::Format;

#[derive(Debug, Error)]
pub enum ClapconfError {
    #[error("No such file: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {} as {format}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: Format,
        message: String,
    },

    #[error("{format} support is not compiled in; enable the '{feature}' feature")]
    MissingBackend {
        format: Format,
        feature: &'static str,
    },

    #[error("Cannot write a config in {format} format")]
    DumpUnsupported { format: Format },

    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config as {format}: {message}")]
    SerializeError { format: Format, message: String },
}
