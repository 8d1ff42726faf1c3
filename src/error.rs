use thiserror::Error;

use std::{num::ParseIntError, path::PathBuf};

use reqwest::StatusCode;

#[derive(Debug, Error)]
pub enum AmpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no client secret for client id '{client_id}' (set amp.client_secret or AMP_CLIENT_SECRET)")]
    MissingSecret { client_id: String },

    #[error("amp.client_id is not configured")]
    MissingClientId,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("found HTTP {status} for {query}")]
    HttpStatus { status: StatusCode, query: String },

    #[error("failed to parse policy XML for '{policy}': {source}")]
    Xml {
        policy: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed exclusion '{entry}': expected at least {expected} fields, found {found}")]
    MalformedExclusion {
        entry: String,
        expected: usize,
        found: usize,
    },

    #[error("exclusion element without text in policy '{policy}'")]
    EmptyExclusion { policy: String },

    #[error("invalid exclusion flag '{value}' in '{entry}': {source}")]
    InvalidFlag {
        entry: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("worker pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),

    #[error("policy task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
