//! # Domain Types
//!
//! Typed records the decision engine works on.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ SellableOption  │   │    Voucher      │   │ VoucherWallet   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price          │   │  min_subtotal   │   │  status         │       │
//! │  │  sale_price?    │   │  shipping_cap   │   │  claimed_at?    │       │
//! │  │  discount?      │   │  starts_at?     │   │  used_at?       │       │
//! │  └────────┬────────┘   │  expires_at?    │   │  expires_at?    │       │
//! │           │            │  is_active      │   └─────────────────┘       │
//! │           ▼            └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │ EffectivePrice  │   │ProductPriceRange│   │ VoucherEligibility  │   │
//! │  │ (derived)       │   │ (derived)       │   │ (derived)           │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inputs use storage (snake_case) field names; derived records serialize in
//! camelCase for the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};

// =============================================================================
// Sellable Option
// =============================================================================

/// One purchasable unit (a product variant).
///
/// `price` is the undiscounted reference price. `sale_price` and `discount`
/// are candidates only; the pricing resolver decides which, if any, applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SellableOption {
    pub price: Money,
    pub sale_price: Option<Money>,
    pub discount: Option<DiscountRate>,
}

impl SellableOption {
    /// An option with no discount fields.
    pub const fn priced(price: Money) -> Self {
        SellableOption {
            price,
            sale_price: None,
            discount: None,
        }
    }

    /// Sets a fixed sale price candidate.
    pub fn with_sale_price(mut self, sale_price: Money) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    /// Sets a percentage discount; non-finite or non-positive input clears it.
    pub fn with_discount_percent(mut self, pct: f64) -> Self {
        self.discount = DiscountRate::from_percent(pct);
        self
    }
}

// =============================================================================
// Derived Prices
// =============================================================================

/// The display-ready price of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePrice {
    pub effective_price: Money,
    pub has_sale: bool,
}

/// Min/max effective price across a product's options.
///
/// `min = max = 0` and `has_sale = false` when the product has no options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceRange {
    pub min: Money,
    pub max: Money,
    pub has_sale: bool,
}

impl ProductPriceRange {
    /// True when every option resolves to the same price.
    pub fn is_single_price(&self) -> bool {
        self.min == self.max
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as seen by pricing and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Listing price used for similarity scoring.
    pub price: Money,
    #[serde(default)]
    pub options: Vec<SellableOption>,
}

impl Product {
    /// Creates a product with no brand, model or options.
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: Money) -> Self {
        Product {
            id: id.into(),
            title: title.into(),
            brand: None,
            model: None,
            price,
            options: Vec::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_option(mut self, option: SellableOption) -> Self {
        self.options.push(option);
        self
    }
}

// =============================================================================
// Voucher
// =============================================================================

/// What a voucher discounts. Only shipping vouchers exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherKind {
    #[default]
    FreeShipping,
}

impl VoucherKind {
    /// Storage spellings, index-aligned with [`VoucherKind::ALL`].
    pub const NAMES: [&'static str; 1] = ["FREE_SHIPPING"];
    pub const ALL: [VoucherKind; 1] = [VoucherKind::FreeShipping];
}

/// A reusable shipping-discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Voucher {
    pub id: String,
    /// Code printed on the voucher, if any (uppercase).
    pub code: Option<String>,
    pub kind: VoucherKind,
    /// Subtotal the checkout must reach (inclusive).
    pub min_subtotal: Money,
    /// Largest shipping discount the voucher grants.
    pub shipping_cap: Money,
    #[ts(as = "Option<String>")]
    pub starts_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Voucher {
    /// An active free-shipping voucher with no date window.
    pub fn free_shipping(id: impl Into<String>, min_subtotal: Money, shipping_cap: Money) -> Self {
        Voucher {
            id: id.into(),
            code: None,
            kind: VoucherKind::FreeShipping,
            min_subtotal,
            shipping_cap,
            starts_at: None,
            expires_at: None,
            is_active: true,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn starting_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

// =============================================================================
// Voucher Wallet
// =============================================================================

/// Lifecycle of a customer's voucher claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletStatus {
    /// Claimed and not yet redeemed.
    #[default]
    Available,
    /// Redeemed on an order.
    Used,
    /// Marked expired by the storefront.
    Expired,
}

impl WalletStatus {
    /// Storage spellings, index-aligned with [`WalletStatus::ALL`].
    pub const NAMES: [&'static str; 3] = ["AVAILABLE", "USED", "EXPIRED"];
    pub const ALL: [WalletStatus; 3] = [
        WalletStatus::Available,
        WalletStatus::Used,
        WalletStatus::Expired,
    ];
}

/// A customer's claim of a voucher.
///
/// The wallet's own `expires_at` may be earlier than the voucher's; both are
/// checked during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoucherWallet {
    pub voucher_id: String,
    pub status: WalletStatus,
    #[ts(as = "Option<String>")]
    pub claimed_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub used_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl VoucherWallet {
    /// An available claim with no dates recorded.
    pub fn available(voucher_id: impl Into<String>) -> Self {
        VoucherWallet {
            voucher_id: voucher_id.into(),
            status: WalletStatus::Available,
            claimed_at: None,
            used_at: None,
            expires_at: None,
        }
    }

    pub fn with_status(mut self, status: WalletStatus) -> Self {
        self.status = status;
        self
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
