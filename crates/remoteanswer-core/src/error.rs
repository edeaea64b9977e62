//! Error types for the storefront.

use crate::catalog::CatalogError;
use crate::ids::IdError;
use crate::review::InvalidRating;
use crate::ProductId;

/// Result type for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Errors that can occur in storefront operations.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Product not found in the catalog.
    #[error("product not found: {product_id}")]
    ProductNotFound {
        /// The product ID that was not found.
        product_id: ProductId,
    },

    /// A checkout is already processing a payment.
    #[error("checkout already in progress for {product_id}")]
    CheckoutInProgress {
        /// The product currently being paid for.
        product_id: ProductId,
    },

    /// The command needs an open checkout.
    #[error("no checkout is open")]
    NoActiveCheckout,

    /// The command is not valid in the checkout's current state.
    #[error("checkout is {actual}, expected {expected}")]
    InvalidCheckoutState {
        /// The state the command requires.
        expected: &'static str,
        /// The state the checkout is in.
        actual: &'static str,
    },

    /// Review rating out of range.
    #[error(transparent)]
    InvalidRating(#[from] InvalidRating),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
