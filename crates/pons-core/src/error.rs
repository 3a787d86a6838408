//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` or wrap it as one variant — both patterns appear
//! in this workspace; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `pons-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `pons-core` consumers.
pub type CoreResult<T> = Result<T, CoreError>;
