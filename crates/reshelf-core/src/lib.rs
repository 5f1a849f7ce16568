//! # reshelf-core: Decision Engine for the Reshelf Storefront
//!
//! This crate holds every pricing, loyalty and shipping-voucher rule the
//! storefront applies, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Reshelf Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront / Backend Rows                    │   │
//! │  │    products, options, vouchers, wallets, lifetime spend         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON snapshot                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 reshelf-quote (apps/quote-cli)                  │   │
//! │  │    price, range, tier, quote, recommend                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ reshelf-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │  loyalty  │  │  voucher  │  │ recommend │  │   │
//! │  │   │ effective │  │   Tier    │  │ eligibil- │  │ similar   │  │   │
//! │  │   │  range    │  │  perks    │  │   ity     │  │ products  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │ checkout  │  │  records  │  │   money   │                  │   │
//! │  │   │  quote    │  │ row → type│  │  Money    │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in centavos, discount rates, display formatting
//! - [`types`] - Options, products, vouchers, wallet claims
//! - [`pricing`] - Effective price and price range resolution
//! - [`loyalty`] - Tier from lifetime spend, perks, progress
//! - [`voucher`] - Shipping voucher eligibility and best-voucher choice
//! - [`recommend`] - "You may also like" similarity scoring
//! - [`checkout`] - Full checkout quote
//! - [`records`] - Storage row normalization
//! - [`validation`] - Identifier and quantity rules
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; "now" is always a parameter
//! 2. **Integer Money**: centavos in i64, percentages in parts-per-million
//! 3. **Never Fail on Data**: malformed numbers and dates are normalized once,
//!    at the storage boundary
//!
//! ## Example Usage
//!
//! ```rust
//! use reshelf_core::money::Money;
//! use reshelf_core::pricing::resolve_effective_price;
//! use reshelf_core::types::SellableOption;
//!
//! let option = SellableOption::priced(Money::from_pesos(1_000)).with_discount_percent(15.0);
//! let price = resolve_effective_price(&option);
//!
//! assert_eq!(price.effective_price.to_string(), "₱850.00");
//! assert!(price.has_sale);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod pricing;
pub mod recommend;
pub mod records;
pub mod types;
pub mod validation;
pub mod voucher;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{quote_checkout, CheckoutInput, CheckoutLine, CheckoutQuote};
pub use error::{CoreError, CoreResult, ValidationError};
pub use loyalty::{tier_from_spend, tier_progress, Tier, TierPerks, TierProgress};
pub use money::{format_currency, DiscountRate, Money};
pub use pricing::{aggregate_range, resolve_effective_price};
pub use recommend::recommend_similar;
pub use types::*;
pub use voucher::{
    best_wallet_voucher, evaluate_voucher, shipping_discount, CheckoutSnapshot, IneligibleReason,
    VoucherEligibility, VoucherVerdict, WalletClaim,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines in a single checkout.
pub const MAX_CHECKOUT_LINES: usize = 100;

/// Maximum quantity of one line.
///
/// Most listings are one-of-a-kind; anything past this is a typo.
pub const MAX_LINE_QUANTITY: i64 = 99;
