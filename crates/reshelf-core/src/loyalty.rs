//! # Loyalty Module
//!
//! Maps lifetime spend to a loyalty tier, reports progress toward the next
//! tier, and answers perk questions.
//!
//! ## Tier Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Lifetime spend (₱)                                                     │
//! │                                                                         │
//! │  0 ───────── 2,000 ───────── 5,000 ───────── 10,000 ──────────►         │
//! │  │  CLASSIC   │    SILVER     │     GOLD      │    PLATINUM             │
//! │                                                                         │
//! │  Thresholds are inclusive lower bounds.                                 │
//! │                                                                         │
//! │  Perk            CLASSIC   SILVER   GOLD   PLATINUM                     │
//! │  ─────────────   ───────   ──────   ────   ────────                     │
//! │  auto-approve       -        -       ✓        ✓                         │
//! │  priority ship      -        -       -        ✓                         │
//! │  enhanced track     -        ✓       ✓        ✓                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tier is derived, never stored: callers pass the pre-aggregated spend and
//! the perk predicates only answer; acting on them is the caller's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{clamp, Money};

// =============================================================================
// Tier
// =============================================================================

/// Loyalty tier, ordered lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    #[default]
    Classic,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// Every tier, lowest first.
    pub const ALL: [Tier; 4] = [Tier::Classic, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Lifetime spend at which this tier starts (inclusive).
    pub const fn threshold(&self) -> Money {
        match self {
            Tier::Classic => Money::zero(),
            Tier::Silver => Money::from_pesos(2_000),
            Tier::Gold => Money::from_pesos(5_000),
            Tier::Platinum => Money::from_pesos(10_000),
        }
    }

    /// The tier above this one, or `None` at the top.
    pub const fn next(&self) -> Option<Tier> {
        match self {
            Tier::Classic => Some(Tier::Silver),
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => None,
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Tier::Classic => "Classic",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    /// Fixed perk set for this tier.
    pub const fn perks(&self) -> TierPerks {
        match self {
            Tier::Classic => TierPerks {
                monthly_voucher_codes: &[],
                auto_approve: false,
                priority_shipping: false,
                enhanced_tracking: false,
            },
            Tier::Silver => TierPerks {
                monthly_voucher_codes: &["SILVER-FREESHIP"],
                auto_approve: false,
                priority_shipping: false,
                enhanced_tracking: true,
            },
            Tier::Gold => TierPerks {
                monthly_voucher_codes: &["GOLD-FREESHIP", "GOLD-FREESHIP-2"],
                auto_approve: true,
                priority_shipping: false,
                enhanced_tracking: true,
            },
            Tier::Platinum => TierPerks {
                monthly_voucher_codes: &[
                    "PLATINUM-FREESHIP",
                    "PLATINUM-FREESHIP-2",
                    "PLATINUM-FREESHIP-3",
                ],
                auto_approve: true,
                priority_shipping: true,
                enhanced_tracking: true,
            },
        }
    }

    /// Orders from this tier may skip manual review.
    pub const fn is_auto_approve(&self) -> bool {
        self.perks().auto_approve
    }

    /// Top tier; gates priority shipping.
    pub const fn is_platinum(&self) -> bool {
        matches!(self, Tier::Platinum)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "tier".to_string(),
                allowed: Tier::ALL.iter().map(|t| t.display_name().to_uppercase()).collect(),
            })
    }
}

/// Benefits attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TierPerks {
    /// Voucher codes granted at the start of each month.
    #[ts(as = "Vec<String>")]
    pub monthly_voucher_codes: &'static [&'static str],
    pub auto_approve: bool,
    pub priority_shipping: bool,
    pub enhanced_tracking: bool,
}

// =============================================================================
// Tier Resolution
// =============================================================================

/// Resolves the tier for a lifetime spend.
///
/// Negative spend counts as zero. Thresholds are checked highest first.
///
/// ```rust
/// use reshelf_core::loyalty::{tier_from_spend, Tier};
/// use reshelf_core::money::Money;
///
/// assert_eq!(tier_from_spend(Money::from_pesos(1_999)), Tier::Classic);
/// assert_eq!(tier_from_spend(Money::from_pesos(2_000)), Tier::Silver);
/// assert_eq!(tier_from_spend(Money::from_major(f64::NAN)), Tier::Classic);
/// ```
pub fn tier_from_spend(spend: Money) -> Tier {
    let spend = spend.non_negative();
    let tier = Tier::ALL
        .into_iter()
        .rev()
        .find(|tier| spend >= tier.threshold())
        .unwrap_or_default();
    trace!(spend = spend.cents(), %tier, "Resolved loyalty tier");
    tier
}

/// Where a customer stands on the tier ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub tier: Tier,
    /// `None` at the top tier.
    pub next_tier: Option<Tier>,
    pub current_min: Money,
    /// `None` at the top tier.
    pub next_min: Option<Money>,
    /// Fraction of the current band completed, in `[0, 1]`.
    pub progress: f64,
    /// Spend still needed to reach the next tier; zero at the top.
    pub remaining: Money,
    /// The normalized spend the progress was computed from.
    pub spend: Money,
}

/// Computes progress toward the next tier.
///
/// ```rust
/// use reshelf_core::loyalty::{tier_progress, Tier};
/// use reshelf_core::money::Money;
///
/// let progress = tier_progress(Money::from_pesos(3_500));
/// assert_eq!(progress.tier, Tier::Silver);
/// assert_eq!(progress.next_tier, Some(Tier::Gold));
/// assert!((progress.progress - 0.5).abs() < 1e-9);
/// assert_eq!(progress.remaining, Money::from_pesos(1_500));
/// ```
pub fn tier_progress(spend: Money) -> TierProgress {
    let spend = spend.non_negative();
    let tier = tier_from_spend(spend);
    let current_min = tier.threshold();

    match tier.next() {
        None => TierProgress {
            tier,
            next_tier: None,
            current_min,
            next_min: None,
            progress: 1.0,
            remaining: Money::zero(),
            spend,
        },
        Some(next_tier) => {
            let next_min = next_tier.threshold();
            let band = (next_min - current_min).cents() as f64;
            let into_band = (spend - current_min).cents() as f64;
            TierProgress {
                tier,
                next_tier: Some(next_tier),
                current_min,
                next_min: Some(next_min),
                progress: clamp(into_band / band, 0.0, 1.0),
                remaining: (next_min - spend).non_negative(),
                spend,
            }
        }
    }
}

/// True for tiers whose orders are approved without review.
pub fn is_auto_approve_tier(tier: Tier) -> bool {
    tier.is_auto_approve()
}

/// True only for the top tier.
pub fn is_platinum_tier(tier: Tier) -> bool {
    tier.is_platinum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_from_spend(Money::from_pesos(0)), Tier::Classic);
        assert_eq!(tier_from_spend(Money::from_pesos(1_999)), Tier::Classic);
        assert_eq!(tier_from_spend(Money::from_cents(199_999)), Tier::Classic);
        assert_eq!(tier_from_spend(Money::from_pesos(2_000)), Tier::Silver);
        assert_eq!(tier_from_spend(Money::from_pesos(4_999)), Tier::Silver);
        assert_eq!(tier_from_spend(Money::from_pesos(5_000)), Tier::Gold);
        assert_eq!(tier_from_spend(Money::from_pesos(9_999)), Tier::Gold);
        assert_eq!(tier_from_spend(Money::from_pesos(10_000)), Tier::Platinum);
        assert_eq!(tier_from_spend(Money::from_pesos(250_000)), Tier::Platinum);
    }

    #[test]
    fn test_malformed_spend_is_classic() {
        assert_eq!(tier_from_spend(Money::from_major(-5.0)), Tier::Classic);
        assert_eq!(tier_from_spend(Money::from_major(f64::NAN)), Tier::Classic);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Tier::Classic < Tier::Silver);
        assert!(Tier::Silver < Tier::Gold);
        assert!(Tier::Gold < Tier::Platinum);
        for pair in Tier::ALL.windows(2) {
            assert!(pair[0].threshold() < pair[1].threshold());
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
    }

    #[test]
    fn test_progress_at_top_tier() {
        let progress = tier_progress(Money::from_pesos(10_000));
        assert_eq!(progress.tier, Tier::Platinum);
        assert_eq!(progress.next_tier, None);
        assert_eq!(progress.next_min, None);
        assert_eq!(progress.progress, 1.0);
        assert_eq!(progress.remaining, Money::zero());
    }

    #[test]
    fn test_progress_from_zero_and_negative() {
        let progress = tier_progress(Money::from_pesos(-50));
        assert_eq!(progress.tier, Tier::Classic);
        assert_eq!(progress.spend, Money::zero());
        assert_eq!(progress.progress, 0.0);
        assert_eq!(progress.remaining, Money::from_pesos(2_000));
    }

    #[test]
    fn test_progress_just_below_threshold() {
        let progress = tier_progress(Money::from_pesos(4_999));
        assert_eq!(progress.tier, Tier::Silver);
        assert_eq!(progress.remaining, Money::from_pesos(1));
        assert!(progress.progress < 1.0 && progress.progress > 0.99);
    }

    #[test]
    fn test_perk_predicates() {
        assert!(!is_auto_approve_tier(Tier::Classic));
        assert!(!is_auto_approve_tier(Tier::Silver));
        assert!(is_auto_approve_tier(Tier::Gold));
        assert!(is_auto_approve_tier(Tier::Platinum));

        assert!(!is_platinum_tier(Tier::Gold));
        assert!(is_platinum_tier(Tier::Platinum));

        for tier in Tier::ALL {
            assert_eq!(tier.perks().priority_shipping, is_platinum_tier(tier));
        }
    }

    #[test]
    fn test_monthly_vouchers_grow_with_tier() {
        let counts: Vec<usize> = Tier::ALL
            .iter()
            .map(|t| t.perks().monthly_voucher_codes.len())
            .collect();
        assert_eq!(counts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tier_parse_and_display() {
        assert_eq!("gold".parse::<Tier>().unwrap(), Tier::Gold);
        assert_eq!(" PLATINUM ".parse::<Tier>().unwrap(), Tier::Platinum);
        assert!("diamond".parse::<Tier>().is_err());
        assert_eq!(Tier::Silver.to_string(), "Silver");
        assert_eq!(serde_json::to_string(&Tier::Gold).unwrap(), "\"GOLD\"");
    }
}
