use std::io;
use thiserror::Error;

/// Errors in this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("unknown domain type: {0}")]
    UnknownType(String),
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),
    #[error("failed to parse rule '{line}': {source}")]
    ParseRule {
        line: String,
        #[source]
        source: Box<Error>,
    },
    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<Error>,
    },
    #[error("circular dependency detected in files: {0:?}")]
    CircularDependency(Vec<String>),
    #[error("included file {target} not found (included by {referrer})")]
    MissingInclusionTarget { target: String, referrer: String },
    #[error("entry name is empty")]
    EmptyEntry,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn other(msg: impl Into<String>) -> Error {
        Error::Other(msg.into())
    }
    /// Attach the offending rule line to an error.
    pub fn in_rule(self, line: impl Into<String>) -> Error {
        Error::ParseRule {
            line: line.into(),
            source: Box::new(self),
        }
    }
    /// Attach the file path the error occurred in.
    pub fn in_file(self, path: impl Into<String>) -> Error {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
