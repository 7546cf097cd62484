//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where they
//! need to surface a configuration problem.

use thiserror::Error;

/// The top-level error type for `tg-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `tg-core`.
pub type CoreResult<T> = Result<T, CoreError>;
