//! # Money Module
//!
//! Provides the `Money` type, the `DiscountRate` type and the currency
//! formatting helpers the display layer relies on.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STORAGE SENDS FLOATS, THE ENGINE COUNTS CENTAVOS                       │
//! │                                                                         │
//! │  Storage row:   { "price": 499.99, "sale_price": null }                 │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  Money::from_major(499.99) ──► Money(49999)   (NaN/Inf ──► Money(0))    │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  Every comparison, cap and sum below runs on i64 centavos               │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  Display: "₱499.99"                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use reshelf_core::money::{format_currency, Money};
//!
//! let price = Money::from_major(1200.0);
//! assert_eq!(price.cents(), 120_000);
//! assert_eq!(price.to_string(), "₱1,200.00");
//!
//! // Malformed amounts degrade to zero instead of failing
//! assert_eq!(format_currency(f64::NAN), "₱0.00");
//! assert_eq!(format_currency(None), "₱0.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

/// Currency symbol used by every formatted amount.
pub const CURRENCY_SYMBOL: &str = "₱";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a peso).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `next_min - spend` may go negative
///   before they are floored
/// - **Saturating arithmetic**: storage can hand over absurd but finite
///   amounts; sums and products clamp at the i64 bounds
/// - **Ord**: min/max folds and caps use the standard ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a whole number of pesos.
    ///
    /// ```rust
    /// use reshelf_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(2000).cents(), 200_000);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Creates a Money value from a major-unit float as stored upstream.
    ///
    /// Non-finite input (NaN, ±Inf) becomes zero. Finite input is rounded
    /// to the nearest centavo; values beyond the i64 range saturate.
    ///
    /// ```rust
    /// use reshelf_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(10.99).cents(), 1099);
    /// assert_eq!(Money::from_major(f64::INFINITY), Money::zero());
    /// assert_eq!(Money::from_major(-5.0).cents(), -500);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        Money((finite_or_zero(amount) * 100.0).round() as i64)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Floors the value at zero.
    ///
    /// Used wherever a storage value must be non-negative but the row
    /// may still carry a negative number.
    #[inline]
    pub fn non_negative(self) -> Self {
        self.max(Money::zero())
    }

    /// Applies a percentage discount, rounding the result to a whole peso.
    ///
    /// The discounted amount is `round(price × (1 − pct/100))` in pesos,
    /// floored at zero and never above the original amount. Integer math
    /// throughout: the product is carried in centavo-ppm (i128) and rounded
    /// once.
    ///
    /// ```rust
    /// use reshelf_core::money::{DiscountRate, Money};
    ///
    /// let price = Money::from_pesos(100);
    /// let rate = DiscountRate::from_bps(2500); // 25%
    /// assert_eq!(price.apply_discount(rate), Money::from_pesos(75));
    ///
    /// // ₱99 at 10% = ₱89.10 → ₱89
    /// let price = Money::from_pesos(99);
    /// assert_eq!(price.apply_discount(DiscountRate::from_bps(1000)), Money::from_pesos(89));
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        let remaining_ppm = (PPM_SCALE - rate.ppm().min(PPM_SCALE)) as i128;
        let scaled = self.0 as i128 * remaining_ppm;
        // scaled is in centavos × 1_000_000; one peso is 100_000_000 of those
        let pesos = if scaled >= 0 {
            (scaled + 50_000_000) / 100_000_000
        } else {
            (scaled - 50_000_000) / 100_000_000
        };
        // Rounding up must not turn a discount into a markup (₱0.51 at 0%)
        Money::from_cents((pesos * 100) as i64)
            .min(*self)
            .non_negative()
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the amount with an explicit currency symbol.
    ///
    /// ```rust
    /// use reshelf_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(123_456_78).format_with_symbol("$"), "$123,456.78");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.0.unsigned_abs() / 100),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money in the shop's fixed convention: `₱1,234.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(CURRENCY_SYMBOL))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Parts-per-million in 100%.
const PPM_SCALE: u32 = 1_000_000;

/// A percentage discount in parts-per-million (10_000 ppm = 1%).
///
/// Always within `0..=1_000_000`; constructors clamp. Storage percentages
/// carry up to four decimals, which this keeps exactly, so rounding happens
/// once on the discounted price and never on the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points (1 bps = 0.01%), clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Self::from_ppm(bps.saturating_mul(100))
    }

    /// Creates a rate from parts-per-million, clamped to 100%.
    #[inline]
    pub const fn from_ppm(ppm: u32) -> Self {
        if ppm > PPM_SCALE {
            DiscountRate(PPM_SCALE)
        } else {
            DiscountRate(ppm)
        }
    }

    /// Creates a rate from a storage percentage.
    ///
    /// Returns `None` when the percentage is non-finite or not strictly
    /// positive: such a discount is ignored entirely. Anything above 100 is
    /// clamped to 100.
    ///
    /// ```rust
    /// use reshelf_core::money::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percent(12.5).map(|r| r.ppm()), Some(125_000));
    /// assert_eq!(DiscountRate::from_percent(0.2501).map(|r| r.ppm()), Some(2_501));
    /// assert_eq!(DiscountRate::from_percent(150.0).map(|r| r.ppm()), Some(1_000_000));
    /// assert_eq!(DiscountRate::from_percent(-10.0), None);
    /// assert_eq!(DiscountRate::from_percent(f64::NAN), None);
    /// ```
    pub fn from_percent(pct: f64) -> Option<Self> {
        if !pct.is_finite() || pct <= 0.0 {
            return None;
        }
        let pct = clamp(pct, 0.0, 100.0);
        Some(DiscountRate::from_ppm((pct * 10_000.0).round() as u32))
    }

    #[inline]
    pub const fn ppm(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }
}

// =============================================================================
// Free Helpers
// =============================================================================

/// Standard clamp that never panics.
///
/// Unlike `f64::clamp`, an inverted range or NaN bound does not panic; a NaN
/// `n` comes back as `min`.
///
/// ```rust
/// use reshelf_core::money::clamp;
///
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-0.2, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
/// ```
pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    n.max(min).min(max)
}

/// Maps non-finite input to `0.0`.
#[inline]
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Formats a major-unit amount as shop currency.
///
/// Missing or non-finite amounts format as zero; this never fails.
pub fn format_currency<A: Into<Option<f64>>>(amount: A) -> String {
    Money::from_major(amount.into().unwrap_or(0.0)).to_string()
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
