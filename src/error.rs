use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("error parsing url {0}")]
    InvalidEntryUrl(String),

    #[error("feed entry is missing field `{field}`")]
    MissingField { field: String },

    #[error("malformed feed entry: {0}")]
    MalformedEntry(String),

    #[error("failed to load store at {path}: {message}")]
    #[diagnostic(help("pass --non-production to start from an empty store"))]
    StoreLoad { path: String, message: String },

    #[error("failed to save store at {path}: {message}")]
    StoreSave { path: String, message: String },

    #[error("arXiv request failed: {0}")]
    ArxivHttp(String),

    #[error("arXiv returned status {status}: {message}")]
    ArxivStatus { status: u16, message: String },

    #[error("failed to parse feed: {0}")]
    FeedParse(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
