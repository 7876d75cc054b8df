use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerdaError {
    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error raised by a [`crate::catalog::store::CatalogStore`] implementation.
///
/// The recognition pipeline never propagates these: store failures are logged
/// at the call site and substituted with the documented fallback.
#[derive(Debug, Clone, thiserror::Error)]
#[error("catalog store error: {0}")]
pub struct StoreError(pub String);
