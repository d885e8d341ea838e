use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("missing required tools: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    #[error("invalid target domain {domain:?}: {reason}")]
    InvalidTarget { domain: String, reason: &'static str },

    #[error("cannot create run directory {path:?}: {source}")]
    RunDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot prepare stage output {path:?}: {source}")]
    StageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write summary {path:?}: {source}")]
    Summary {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
