//! # Storage Records
//!
//! Loose rows as the storefront's backend returns them, and their one-time
//! normalization into engine types.
//!
//! ## Normalization Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field kind        Malformed value            Becomes                  │
//! │  ───────────────   ────────────────────────   ──────────────────────   │
//! │  required amount   null / NaN / Inf           0                        │
//! │  optional amount   null / NaN / Inf           None (ignored)           │
//! │  discount percent  null / NaN / <= 0          None (ignored)           │
//! │  timestamp         null / unparseable         None ("no constraint")   │
//! │  is_active         null                       true                     │
//! │  id                blank                      ValidationError          │
//! │  status / kind     unknown tag                ValidationError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unparseable expiry silently means "never expires". That is kept as
//! policy, but every dropped timestamp is logged at `warn` so garbled rows
//! surface in the logs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::money::{finite_or_zero, Money};
use crate::types::{Product, SellableOption, Voucher, VoucherKind, VoucherWallet, WalletStatus};
use crate::validation::{validate_one_of, validate_required, validate_voucher_code};
use crate::voucher::WalletClaim;

// =============================================================================
// Field Normalizers
// =============================================================================

/// Required amount: missing or non-finite becomes zero.
fn amount(raw: Option<f64>) -> Money {
    Money::from_major(raw.unwrap_or(0.0))
}

/// Optional amount: missing or non-finite is dropped.
fn optional_amount(raw: Option<f64>) -> Option<Money> {
    raw.filter(|n| n.is_finite()).map(Money::from_major)
}

/// Parses a storage timestamp.
///
/// Accepts RFC 3339 (`2024-06-30T23:59:59+08:00`), a naive
/// `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS` taken as UTC, and a bare
/// `YYYY-MM-DD` taken as midnight UTC. Anything else is `None`.
///
/// ```rust
/// use reshelf_core::records::parse_timestamp;
///
/// assert!(parse_timestamp("expires_at", Some("2024-06-30T23:59:59Z")).is_some());
/// assert!(parse_timestamp("expires_at", Some("2024-06-30")).is_some());
/// assert!(parse_timestamp("expires_at", Some("next tuesday")).is_none());
/// assert!(parse_timestamp("expires_at", None).is_none());
/// ```
pub fn parse_timestamp(field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(midnight.and_utc());
    }

    warn!(field, value = raw, "Unparseable timestamp treated as no constraint");
    None
}

// =============================================================================
// Option / Product Rows
// =============================================================================

/// A product variant row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl From<OptionRecord> for SellableOption {
    fn from(record: OptionRecord) -> Self {
        let mut option = SellableOption::priced(amount(record.price));
        option.sale_price = optional_amount(record.sale_price);
        if let Some(pct) = record.discount_percent {
            option = option.with_discount_percent(finite_or_zero(pct));
        }
        option
    }
}

/// A product row with its variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub options: Vec<OptionRecord>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CoreError;

    fn try_from(record: ProductRecord) -> CoreResult<Self> {
        let id = validate_required("product id", &record.id)?;
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        Ok(Product {
            id,
            title: record.title.unwrap_or_default(),
            brand: non_blank(record.brand),
            model: non_blank(record.model),
            price: amount(record.price),
            options: record.options.into_iter().map(SellableOption::from).collect(),
        })
    }
}

// =============================================================================
// Voucher Rows
// =============================================================================

/// A voucher definition row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub min_subtotal: Option<f64>,
    #[serde(default)]
    pub shipping_cap: Option<f64>,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<VoucherRecord> for Voucher {
    type Error = CoreError;

    fn try_from(record: VoucherRecord) -> CoreResult<Self> {
        let id = validate_required("voucher id", &record.id)?;

        let code = match record.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(validate_voucher_code(code)?),
            _ => None,
        };

        let kind = match record.kind.as_deref() {
            None => VoucherKind::default(),
            Some(tag) => VoucherKind::ALL[validate_one_of("voucher kind", tag, &VoucherKind::NAMES)?],
        };

        Ok(Voucher {
            id,
            code,
            kind,
            min_subtotal: amount(record.min_subtotal),
            shipping_cap: amount(record.shipping_cap),
            starts_at: parse_timestamp("starts_at", record.starts_at.as_deref()),
            expires_at: parse_timestamp("expires_at", record.expires_at.as_deref()),
            // Only an explicit false deactivates
            is_active: record.is_active.unwrap_or(true),
        })
    }
}

/// A customer's wallet row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub voucher_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub claimed_at: Option<String>,
    #[serde(default)]
    pub used_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl TryFrom<WalletRecord> for VoucherWallet {
    type Error = CoreError;

    fn try_from(record: WalletRecord) -> CoreResult<Self> {
        let voucher_id = validate_required("wallet voucher id", &record.voucher_id)?;

        let status = match record.status.as_deref() {
            None => WalletStatus::default(),
            Some(tag) => {
                WalletStatus::ALL[validate_one_of("wallet status", tag, &WalletStatus::NAMES)?]
            }
        };

        Ok(VoucherWallet {
            voucher_id,
            status,
            claimed_at: parse_timestamp("claimed_at", record.claimed_at.as_deref()),
            used_at: parse_timestamp("used_at", record.used_at.as_deref()),
            expires_at: parse_timestamp("wallet expires_at", record.expires_at.as_deref()),
        })
    }
}

/// A voucher row joined with the customer's wallet row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub voucher: VoucherRecord,
    pub wallet: WalletRecord,
}

impl TryFrom<ClaimRecord> for WalletClaim {
    type Error = CoreError;

    fn try_from(record: ClaimRecord) -> CoreResult<Self> {
        Ok(WalletClaim::new(
            Voucher::try_from(record.voucher)?,
            VoucherWallet::try_from(record.wallet)?,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
