//! # Error Types
//!
//! Domain-specific error types for reshelf-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Surfaces                                  │
//! │                                                                         │
//! │  Decision functions (pricing, loyalty, voucher, recommend)             │
//! │  └── NEVER fail. Malformed numbers/dates are normalized; an            │
//! │      unusable voucher is an `eligible: false` verdict, not an error.   │
//! │                                                                         │
//! │  Storage boundary (records, validation, checkout input)                │
//! │  ├── ValidationError  - identifiers, enum tags, quantities             │
//! │  └── CoreError        - wraps ValidationError + checkout shape errors  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError (apps/quote-cli)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while building engine inputs from caller data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A checkout was quoted with no lines.
    #[error("Checkout has no items")]
    EmptyCheckout,

    /// Checkout has more lines than allowed.
    #[error("Checkout cannot have more than {max} items")]
    CheckoutTooLarge { max: usize },

    /// Product referenced by a recommendation request is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors at the storage boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
