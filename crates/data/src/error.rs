use std::path::PathBuf;

use marketlens_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not parse CSV `{path}`: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("could not parse JSON `{path}`: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("could not write `{path}`: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
