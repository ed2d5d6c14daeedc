//! Error types.
//!
//! Malformed display parameters never produce errors; they fall back to
//! their defaults. These variants cover infrastructure failures only.

use thiserror::Error;

/// Kinship errors.
#[derive(Debug, Error)]
pub enum KinshipError {
    #[error("invalid site fixture: {0}")]
    Fixture(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("content store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using KinshipError.
pub type KinshipResult<T> = Result<T, KinshipError>;
