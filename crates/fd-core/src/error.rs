//! Workspace error type.
//!
//! Sub-crates define their own error enums; `FdError` covers what `fd-core`
//! itself can reject.

use thiserror::Error;

/// Errors raised by `fd-core`.
#[derive(Debug, Error)]
pub enum FdError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fd-core`.
pub type FdResult<T> = Result<T, FdError>;
