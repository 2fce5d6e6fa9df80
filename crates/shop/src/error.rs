//! Unified error type for consumers of the whole domain layer.
//!
//! Each accessor keeps its own error enum; `ShopError` folds them together
//! for callers (the CLI, a future web layer) that drive several accessors
//! and want one `Result` type.

use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::orders::OrderError;
use crate::store::StoreError;

/// Any error the domain layer can produce.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration loading failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Order operation failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Auth operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store operation failed outside any accessor.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for `ShopError`.
pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_passes_through() {
        let err = ShopError::from(CatalogError::NotConfigured);
        assert_eq!(err.to_string(), "catalog store is not configured");

        let err = ShopError::from(OrderError::EmptyCart);
        assert_eq!(err.to_string(), "cannot create an order from an empty cart");
    }
}
