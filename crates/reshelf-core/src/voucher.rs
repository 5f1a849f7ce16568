//! # Voucher Module
//!
//! Decides whether a shipping voucher applies to a checkout and how much of
//! the shipping fee it removes.
//!
//! ## Evaluation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate_voucher(voucher, wallet_expires_at, snapshot)                 │
//! │                                                                         │
//! │  shipping_fee <= 0 ? ───────────► "shipping fee is zero."               │
//! │        │                                                                │
//! │  !is_active ? ──────────────────► "voucher is inactive."                │
//! │        │                                                                │
//! │  now < starts_at ? ─────────────► "not active yet."                     │
//! │        │                                                                │
//! │  now > expires_at (voucher       ► "voucher expired."                   │
//! │        or wallet) ?                                                     │
//! │        │                                                                │
//! │  subtotal < min_subtotal ? ─────► "minimum spend not met."              │
//! │        │                                                                │
//! │  discount = min(fee, cap) <= 0 ?► "not eligible."                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  eligible { discount }                                                  │
//! │                                                                         │
//! │  First failing check wins. A missing date is "no constraint".           │
//! │  Wallet claims: fee check, then USED / EXPIRED status, then the chain.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Now" is always supplied by the caller; nothing here reads a clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Voucher, VoucherWallet, WalletStatus};

// =============================================================================
// Result Types
// =============================================================================

/// Why a voucher does not apply.
///
/// Serializes as the human-readable message shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum IneligibleReason {
    #[serde(rename = "shipping fee is zero.")]
    ShippingFeeZero,
    #[serde(rename = "voucher is inactive.")]
    Inactive,
    #[serde(rename = "not active yet.")]
    NotStarted,
    #[serde(rename = "voucher expired.")]
    Expired,
    #[serde(rename = "minimum spend not met.")]
    MinimumSpendNotMet,
    #[serde(rename = "voucher already used.")]
    AlreadyUsed,
    #[serde(rename = "not eligible.")]
    NotEligible,
}

impl IneligibleReason {
    pub const fn message(&self) -> &'static str {
        match self {
            IneligibleReason::ShippingFeeZero => "shipping fee is zero.",
            IneligibleReason::Inactive => "voucher is inactive.",
            IneligibleReason::NotStarted => "not active yet.",
            IneligibleReason::Expired => "voucher expired.",
            IneligibleReason::MinimumSpendNotMet => "minimum spend not met.",
            IneligibleReason::AlreadyUsed => "voucher already used.",
            IneligibleReason::NotEligible => "not eligible.",
        }
    }
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Verdict for one voucher against one checkout snapshot.
///
/// `discount` is zero whenever `eligible` is false; `reason` is set exactly
/// when `eligible` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VoucherEligibility {
    pub eligible: bool,
    pub discount: Money,
    pub reason: Option<IneligibleReason>,
}

impl VoucherEligibility {
    pub const fn eligible(discount: Money) -> Self {
        VoucherEligibility {
            eligible: true,
            discount,
            reason: None,
        }
    }

    pub const fn ineligible(reason: IneligibleReason) -> Self {
        VoucherEligibility {
            eligible: false,
            discount: Money::zero(),
            reason: Some(reason),
        }
    }
}

/// The parts of a checkout a voucher is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSnapshot {
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub now: DateTime<Utc>,
}

// =============================================================================
// Shipping Discount
// =============================================================================

/// Shipping discount a voucher grants, ignoring dates and activity.
///
/// Zero when there is no fee or the subtotal misses the minimum; otherwise
/// the cap (floored at zero) limited by the fee actually charged.
///
/// ```rust
/// use reshelf_core::money::Money;
/// use reshelf_core::types::Voucher;
/// use reshelf_core::voucher::shipping_discount;
///
/// let voucher = Voucher::free_shipping("v-1", Money::from_pesos(500), Money::from_pesos(100));
/// let fee_above_cap = shipping_discount(Money::from_pesos(1_000), Money::from_pesos(150), &voucher);
/// assert_eq!(fee_above_cap, Money::from_pesos(100));
///
/// let fee_below_cap = shipping_discount(Money::from_pesos(1_000), Money::from_pesos(50), &voucher);
/// assert_eq!(fee_below_cap, Money::from_pesos(50));
/// ```
pub fn shipping_discount(subtotal: Money, shipping_fee: Money, voucher: &Voucher) -> Money {
    if !shipping_fee.is_positive() || subtotal < voucher.min_subtotal {
        return Money::zero();
    }
    shipping_fee.min(voucher.shipping_cap.non_negative())
}

// =============================================================================
// Evaluation
// =============================================================================

/// Runs the ordered eligibility chain for one voucher.
///
/// `wallet_expires_at` is the claim's own expiry, checked alongside the
/// voucher's; whichever passes first expires the voucher.
pub fn evaluate_voucher(
    voucher: &Voucher,
    wallet_expires_at: Option<DateTime<Utc>>,
    snapshot: &CheckoutSnapshot,
) -> VoucherEligibility {
    let verdict = run_checks(voucher, wallet_expires_at, snapshot);
    if let Some(reason) = verdict.reason {
        debug!(voucher_id = %voucher.id, %reason, "Voucher rejected");
    } else {
        debug!(
            voucher_id = %voucher.id,
            discount = verdict.discount.cents(),
            "Voucher applies"
        );
    }
    verdict
}

fn run_checks(
    voucher: &Voucher,
    wallet_expires_at: Option<DateTime<Utc>>,
    snapshot: &CheckoutSnapshot,
) -> VoucherEligibility {
    let now = snapshot.now;

    if !snapshot.shipping_fee.is_positive() {
        return VoucherEligibility::ineligible(IneligibleReason::ShippingFeeZero);
    }

    if !voucher.is_active {
        return VoucherEligibility::ineligible(IneligibleReason::Inactive);
    }

    if voucher.starts_at.is_some_and(|starts_at| now < starts_at) {
        return VoucherEligibility::ineligible(IneligibleReason::NotStarted);
    }

    let expired = |expires_at: Option<DateTime<Utc>>| expires_at.is_some_and(|at| now > at);
    if expired(voucher.expires_at) || expired(wallet_expires_at) {
        return VoucherEligibility::ineligible(IneligibleReason::Expired);
    }

    if snapshot.subtotal < voucher.min_subtotal {
        return VoucherEligibility::ineligible(IneligibleReason::MinimumSpendNotMet);
    }

    let discount = shipping_discount(snapshot.subtotal, snapshot.shipping_fee, voucher);
    if !discount.is_positive() {
        return VoucherEligibility::ineligible(IneligibleReason::NotEligible);
    }

    VoucherEligibility::eligible(discount)
}

// =============================================================================
// Wallet Claims
// =============================================================================

/// A voucher together with the customer's claim of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletClaim {
    pub voucher: Voucher,
    pub wallet: VoucherWallet,
}

impl WalletClaim {
    pub fn new(voucher: Voucher, wallet: VoucherWallet) -> Self {
        WalletClaim { voucher, wallet }
    }
}

/// Verdict for a single claim, keyed by voucher id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VoucherVerdict {
    pub voucher_id: String,
    pub code: Option<String>,
    pub eligibility: VoucherEligibility,
}

/// Evaluates a claim, honoring the wallet's status before the voucher chain.
///
/// A zero shipping fee is reported first, whatever the claim's state. After
/// that a used claim can never apply again, and a claim the storefront
/// already marked expired is reported as expired even if its dates say
/// otherwise. Available claims go through [`evaluate_voucher`] with the
/// wallet expiry.
pub fn evaluate_wallet(claim: &WalletClaim, snapshot: &CheckoutSnapshot) -> VoucherEligibility {
    if !snapshot.shipping_fee.is_positive() {
        return VoucherEligibility::ineligible(IneligibleReason::ShippingFeeZero);
    }

    match claim.wallet.status {
        WalletStatus::Used => {
            debug!(voucher_id = %claim.voucher.id, "Wallet claim already used");
            VoucherEligibility::ineligible(IneligibleReason::AlreadyUsed)
        }
        WalletStatus::Expired => {
            debug!(voucher_id = %claim.voucher.id, "Wallet claim marked expired");
            VoucherEligibility::ineligible(IneligibleReason::Expired)
        }
        WalletStatus::Available => {
            evaluate_voucher(&claim.voucher, claim.wallet.expires_at, snapshot)
        }
    }
}

/// Evaluates every claim, preserving input order.
pub fn evaluate_claims(claims: &[WalletClaim], snapshot: &CheckoutSnapshot) -> Vec<VoucherVerdict> {
    claims
        .iter()
        .map(|claim| VoucherVerdict {
            voucher_id: claim.voucher.id.clone(),
            code: claim.voucher.code.clone(),
            eligibility: evaluate_wallet(claim, snapshot),
        })
        .collect()
}

/// Picks the eligible claim with the largest discount.
///
/// On equal discounts the earlier claim wins. `None` when nothing applies.
pub fn best_wallet_voucher(
    claims: &[WalletClaim],
    snapshot: &CheckoutSnapshot,
) -> Option<VoucherVerdict> {
    pick_best(evaluate_claims(claims, snapshot))
}

pub(crate) fn pick_best(verdicts: Vec<VoucherVerdict>) -> Option<VoucherVerdict> {
    verdicts
        .into_iter()
        .filter(|verdict| verdict.eligibility.eligible)
        .fold(None, |best: Option<VoucherVerdict>, verdict| match best {
            Some(current) if current.eligibility.discount >= verdict.eligibility.discount => {
                Some(current)
            }
            _ => Some(verdict),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
