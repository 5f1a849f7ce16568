//! # Checkout Quote
//!
//! Combines pricing, loyalty and voucher decisions into one quote for a
//! cart about to be checked out.
//!
//! ## Quote Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutInput                                                          │
//! │    lines ──► resolve_effective_price × qty ──► subtotal                 │
//! │                                                  │                      │
//! │    shipping_fee ─────────────────────────────────┤                      │
//! │    claims ──► evaluate_claims(snapshot) ──► best voucher ──► discount   │
//! │    lifetime_spend ──► tier_from_spend ──► perks                         │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │  CheckoutQuote { total = subtotal + fee − discount, tier, verdicts }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the single best voucher is applied; the rest are reported with their
//! verdicts so the storefront can show why each one was skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::loyalty::{tier_from_spend, Tier};
use crate::money::Money;
use crate::pricing::resolve_effective_price;
use crate::types::{EffectivePrice, SellableOption};
use crate::validation::validate_quantity;
use crate::voucher::{evaluate_claims, pick_best, CheckoutSnapshot, VoucherVerdict, WalletClaim};
use crate::MAX_CHECKOUT_LINES;

// =============================================================================
// Input
// =============================================================================

/// One cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub option: SellableOption,
    pub quantity: i64,
}

impl CheckoutLine {
    pub fn new(option: SellableOption, quantity: i64) -> Self {
        CheckoutLine { option, quantity }
    }
}

/// Everything needed to quote a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInput {
    pub lines: Vec<CheckoutLine>,
    pub shipping_fee: Money,
    /// Customer's lifetime spend, used for the loyalty tier.
    pub lifetime_spend: Money,
    #[serde(default)]
    pub claims: Vec<WalletClaim>,
    pub now: DateTime<Utc>,
}

// =============================================================================
// Output
// =============================================================================

/// A priced cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuotedLine {
    pub unit: EffectivePrice,
    pub quantity: i64,
    pub line_total: Money,
}

/// The full quote shown at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub lines: Vec<QuotedLine>,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub shipping_discount: Money,
    pub total: Money,
    pub tier: Tier,
    /// Orders from this tier skip manual review.
    pub auto_approve: bool,
    pub priority_shipping: bool,
    /// Verdict for every claim, in input order.
    pub vouchers: Vec<VoucherVerdict>,
    /// The applied voucher, if any.
    pub applied_voucher: Option<VoucherVerdict>,
}

impl CheckoutQuote {
    /// True when any line is discounted.
    pub fn has_sale(&self) -> bool {
        self.lines.iter().any(|line| line.unit.has_sale)
    }
}

// =============================================================================
// Quoting
// =============================================================================

/// Prices a checkout.
///
/// ## Errors
/// - [`CoreError::EmptyCheckout`] when there are no lines
/// - [`CoreError::CheckoutTooLarge`] past `MAX_CHECKOUT_LINES`
/// - [`CoreError::Validation`] for a quantity outside `1..=99`
///
/// ```rust
/// use chrono::Utc;
/// use reshelf_core::checkout::{quote_checkout, CheckoutInput, CheckoutLine};
/// use reshelf_core::loyalty::Tier;
/// use reshelf_core::money::Money;
/// use reshelf_core::types::SellableOption;
///
/// let input = CheckoutInput {
///     lines: vec![CheckoutLine::new(SellableOption::priced(Money::from_pesos(250)), 2)],
///     shipping_fee: Money::from_pesos(80),
///     lifetime_spend: Money::zero(),
///     claims: vec![],
///     now: Utc::now(),
/// };
///
/// let quote = quote_checkout(&input).unwrap();
/// assert_eq!(quote.subtotal, Money::from_pesos(500));
/// assert_eq!(quote.total, Money::from_pesos(580));
/// assert_eq!(quote.tier, Tier::Classic);
/// ```
pub fn quote_checkout(input: &CheckoutInput) -> CoreResult<CheckoutQuote> {
    if input.lines.is_empty() {
        return Err(CoreError::EmptyCheckout);
    }
    if input.lines.len() > MAX_CHECKOUT_LINES {
        return Err(CoreError::CheckoutTooLarge {
            max: MAX_CHECKOUT_LINES,
        });
    }

    let lines = input
        .lines
        .iter()
        .map(|line| {
            validate_quantity(line.quantity)?;
            let unit = resolve_effective_price(&line.option);
            Ok(QuotedLine {
                unit,
                quantity: line.quantity,
                line_total: unit.effective_price.multiply_quantity(line.quantity),
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let subtotal: Money = lines.iter().map(|line| line.line_total).sum();
    let shipping_fee = input.shipping_fee.non_negative();

    let snapshot = CheckoutSnapshot {
        subtotal,
        shipping_fee,
        now: input.now,
    };
    let vouchers = evaluate_claims(&input.claims, &snapshot);
    let applied_voucher = pick_best(vouchers.clone());
    let shipping_discount = applied_voucher
        .as_ref()
        .map(|verdict| verdict.eligibility.discount)
        .unwrap_or_default();

    let tier = tier_from_spend(input.lifetime_spend);
    let perks = tier.perks();
    let total = subtotal + shipping_fee - shipping_discount;

    debug!(
        lines = lines.len(),
        subtotal = subtotal.cents(),
        shipping_discount = shipping_discount.cents(),
        total = total.cents(),
        %tier,
        "Quoted checkout"
    );

    Ok(CheckoutQuote {
        lines,
        subtotal,
        shipping_fee,
        shipping_discount,
        total,
        tier,
        auto_approve: perks.auto_approve,
        priority_shipping: perks.priority_shipping,
        vouchers,
        applied_voucher,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{Voucher, VoucherWallet, WalletStatus};
    use crate::voucher::IneligibleReason;
    use chrono::TimeZone;

    fn pesos(n: i64) -> Money {
        Money::from_pesos(n)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn input(lines: Vec<CheckoutLine>, fee: i64, spend: i64) -> CheckoutInput {
        CheckoutInput {
            lines,
            shipping_fee: pesos(fee),
            lifetime_spend: pesos(spend),
            claims: Vec::new(),
            now: now(),
        }
    }

    #[test]
    fn test_gold_customer_with_sale_item_and_voucher() {
        let option = SellableOption::priced(pesos(500)).with_sale_price(pesos(400));
        let mut input = input(vec![CheckoutLine::new(option, 3)], 150, 6_200);
        input.claims.push(WalletClaim::new(
            Voucher::free_shipping("v-gold", pesos(1_000), pesos(200)),
            VoucherWallet::available("v-gold"),
        ));

        let quote = quote_checkout(&input).unwrap();

        assert_eq!(quote.lines[0].unit.effective_price, pesos(400));
        assert!(quote.has_sale());
        assert_eq!(quote.subtotal, pesos(1_200));
        assert_eq!(quote.shipping_discount, pesos(150));
        assert_eq!(quote.total, pesos(1_200));
        assert_eq!(quote.tier, Tier::Gold);
        assert!(quote.auto_approve);
        assert!(!quote.priority_shipping);
        assert_eq!(
            quote.applied_voucher.map(|v| v.voucher_id),
            Some("v-gold".to_string())
        );
    }

    #[test]
    fn test_best_voucher_applied_others_reported() {
        let mut input = input(
            vec![CheckoutLine::new(SellableOption::priced(pesos(600)), 1)],
            120,
            0,
        );
        input.claims = vec![
            WalletClaim::new(
                Voucher::free_shipping("used", pesos(0), pesos(120)),
                VoucherWallet::available("used").with_status(WalletStatus::Used),
            ),
            WalletClaim::new(
                Voucher::free_shipping("small", pesos(0), pesos(50)),
                VoucherWallet::available("small"),
            ),
            WalletClaim::new(
                Voucher::free_shipping("min-too-high", pesos(1_000), pesos(120)),
                VoucherWallet::available("min-too-high"),
            ),
        ];

        let quote = quote_checkout(&input).unwrap();
        assert_eq!(quote.vouchers.len(), 3);
        assert_eq!(
            quote.vouchers[0].eligibility.reason,
            Some(IneligibleReason::AlreadyUsed)
        );
        assert_eq!(
            quote.vouchers[2].eligibility.reason,
            Some(IneligibleReason::MinimumSpendNotMet)
        );
        assert_eq!(quote.shipping_discount, pesos(50));
        assert_eq!(quote.total, pesos(670));
    }

    #[test]
    fn test_zero_fee_means_no_discount() {
        let mut input = input(
            vec![CheckoutLine::new(SellableOption::priced(pesos(100)), 1)],
            0,
            20_000,
        );
        input.claims.push(WalletClaim::new(
            Voucher::free_shipping("v", pesos(0), pesos(100)),
            VoucherWallet::available("v"),
        ));

        let quote = quote_checkout(&input).unwrap();
        assert_eq!(quote.applied_voucher, None);
        assert_eq!(quote.total, pesos(100));
        assert_eq!(quote.tier, Tier::Platinum);
        assert!(quote.priority_shipping);
    }

    #[test]
    fn test_negative_fee_treated_as_zero() {
        let quote = quote_checkout(&input(
            vec![CheckoutLine::new(SellableOption::priced(pesos(100)), 1)],
            -30,
            0,
        ))
        .unwrap();
        assert_eq!(quote.shipping_fee, Money::zero());
        assert_eq!(quote.total, pesos(100));
    }

    #[test]
    fn test_absurd_prices_saturate() {
        let option = SellableOption::priced(Money::from_major(1e17));
        let mut input = input(vec![CheckoutLine::new(option, 2)], 150, 0);
        input.claims.push(WalletClaim::new(
            Voucher::free_shipping("v", pesos(0), pesos(100)),
            VoucherWallet::available("v"),
        ));

        let quote = quote_checkout(&input).unwrap();
        assert_eq!(quote.lines[0].line_total.cents(), i64::MAX);
        assert_eq!(quote.subtotal.cents(), i64::MAX);
        assert_eq!(quote.shipping_discount, pesos(100));
        assert!(quote.total <= quote.subtotal + quote.shipping_fee);
        assert!(quote.total.is_positive());
    }

    #[test]
    fn test_empty_checkout() {
        assert!(matches!(
            quote_checkout(&input(vec![], 100, 0)),
            Err(CoreError::EmptyCheckout)
        ));
    }

    #[test]
    fn test_too_many_lines() {
        let line = CheckoutLine::new(SellableOption::priced(pesos(1)), 1);
        let lines = vec![line; MAX_CHECKOUT_LINES + 1];
        assert!(matches!(
            quote_checkout(&input(lines, 100, 0)),
            Err(CoreError::CheckoutTooLarge { max }) if max == MAX_CHECKOUT_LINES
        ));
    }

    #[test]
    fn test_bad_quantity() {
        let lines = vec![CheckoutLine::new(SellableOption::priced(pesos(1)), 0)];
        assert!(matches!(
            quote_checkout(&input(lines, 100, 0)),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let quote = quote_checkout(&input(
            vec![CheckoutLine::new(SellableOption::priced(pesos(100)), 2)],
            50,
            0,
        ))
        .unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["shippingDiscount"], 0);
        assert_eq!(json["lines"][0]["lineTotal"], 20_000);
        assert_eq!(json["tier"], "CLASSIC");
    }
}
