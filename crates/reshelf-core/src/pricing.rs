//! # Pricing Module
//!
//! Resolves the price a customer actually pays for an option and folds a
//! product's options into a display range.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_effective_price(option)                                        │
//! │                                                                         │
//! │  1. price < 0 ? ──────────────────────────────► price = 0               │
//! │                                                                         │
//! │  2. 0 < sale_price < price ? ─── yes ─────────► { sale_price, true }    │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  3. discount set ? ───────────── yes ──► d = round(price × (1 − pct))   │
//! │        │ no                               { d, d < price }              │
//! │        ▼                                                                │
//! │  4. ──────────────────────────────────────────► { price, false }        │
//! │                                                                         │
//! │  A fixed sale price and a percentage are NEVER combined.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::types::{EffectivePrice, Product, ProductPriceRange, SellableOption};

/// Computes the effective unit price of one option.
///
/// ```rust
/// use reshelf_core::money::Money;
/// use reshelf_core::pricing::resolve_effective_price;
/// use reshelf_core::types::SellableOption;
///
/// let option = SellableOption::priced(Money::from_pesos(100))
///     .with_sale_price(Money::from_pesos(80))
///     .with_discount_percent(50.0);
///
/// let resolved = resolve_effective_price(&option);
/// assert_eq!(resolved.effective_price, Money::from_pesos(80));
/// assert!(resolved.has_sale);
/// ```
pub fn resolve_effective_price(option: &SellableOption) -> EffectivePrice {
    let price = option.price.non_negative();

    if let Some(sale_price) = option.sale_price {
        if sale_price.is_positive() && sale_price < price {
            return EffectivePrice {
                effective_price: sale_price,
                has_sale: true,
            };
        }
    }

    if let Some(rate) = option.discount {
        let discounted = price.apply_discount(rate);
        return EffectivePrice {
            effective_price: discounted,
            has_sale: discounted < price,
        };
    }

    EffectivePrice {
        effective_price: price,
        has_sale: false,
    }
}

/// Folds every option through the resolver into a min/max range.
///
/// All options are evaluated so `has_sale` reflects "at least one option is
/// on sale" no matter which option sets the bounds.
///
/// ```rust
/// use reshelf_core::money::Money;
/// use reshelf_core::pricing::aggregate_range;
/// use reshelf_core::types::{ProductPriceRange, SellableOption};
///
/// assert_eq!(aggregate_range(&[]), ProductPriceRange::default());
///
/// let options = [
///     SellableOption::priced(Money::from_pesos(300)),
///     SellableOption::priced(Money::from_pesos(500)).with_sale_price(Money::from_pesos(450)),
/// ];
/// let range = aggregate_range(&options);
/// assert_eq!(range.min, Money::from_pesos(300));
/// assert_eq!(range.max, Money::from_pesos(450));
/// assert!(range.has_sale);
/// ```
pub fn aggregate_range(options: &[SellableOption]) -> ProductPriceRange {
    let mut resolved = options.iter().map(resolve_effective_price);

    let Some(first) = resolved.next() else {
        return ProductPriceRange::default();
    };

    resolved.fold(
        ProductPriceRange {
            min: first.effective_price,
            max: first.effective_price,
            has_sale: first.has_sale,
        },
        |range, price| ProductPriceRange {
            min: range.min.min(price.effective_price),
            max: range.max.max(price.effective_price),
            has_sale: range.has_sale || price.has_sale,
        },
    )
}

impl SellableOption {
    /// Shorthand for [`resolve_effective_price`].
    pub fn effective_price(&self) -> EffectivePrice {
        resolve_effective_price(self)
    }
}

impl Product {
    /// Price range across this product's options.
    pub fn price_range(&self) -> ProductPriceRange {
        aggregate_range(&self.options)
    }

    /// True when any option is currently discounted.
    pub fn has_sale(&self) -> bool {
        self.price_range().has_sale
    }

    /// Lowest price a shopper can pay, falling back to the listing price
    /// for products without options.
    pub fn from_price(&self) -> Money {
        if self.options.is_empty() {
            self.price.non_negative()
        } else {
            self.price_range().min
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::DiscountRate;
    use proptest::prelude::*;

    fn pesos(n: i64) -> Money {
        Money::from_pesos(n)
    }

    #[test]
    fn test_no_sale_fields_is_identity() {
        let resolved = resolve_effective_price(&SellableOption::priced(pesos(250)));
        assert_eq!(resolved.effective_price, pesos(250));
        assert!(!resolved.has_sale);
    }

    #[test]
    fn test_sale_price_beats_percentage() {
        let option = SellableOption::priced(pesos(100))
            .with_sale_price(pesos(80))
            .with_discount_percent(50.0);
        assert_eq!(
            resolve_effective_price(&option),
            EffectivePrice {
                effective_price: pesos(80),
                has_sale: true
            }
        );
    }

    #[test]
    fn test_percentage_above_hundred_clamps_to_free() {
        let option = SellableOption::priced(pesos(100)).with_discount_percent(150.0);
        assert_eq!(
            resolve_effective_price(&option),
            EffectivePrice {
                effective_price: Money::zero(),
                has_sale: true
            }
        );
    }

    #[test]
    fn test_sale_price_not_below_price_is_ignored() {
        let option = SellableOption::priced(pesos(100)).with_sale_price(pesos(120));
        assert_eq!(
            resolve_effective_price(&option),
            EffectivePrice {
                effective_price: pesos(100),
                has_sale: false
            }
        );

        let equal = SellableOption::priced(pesos(100)).with_sale_price(pesos(100));
        assert!(!resolve_effective_price(&equal).has_sale);
    }

    #[test]
    fn test_invalid_sale_price_falls_through_to_percentage() {
        let option = SellableOption::priced(pesos(200))
            .with_sale_price(pesos(250))
            .with_discount_percent(25.0);
        assert_eq!(resolve_effective_price(&option).effective_price, pesos(150));

        let zero_sale = SellableOption::priced(pesos(200))
            .with_sale_price(Money::zero())
            .with_discount_percent(10.0);
        assert_eq!(resolve_effective_price(&zero_sale).effective_price, pesos(180));
    }

    #[test]
    fn test_rounding_neutral_discount_is_not_a_sale() {
        // ₱10 at 1% = ₱9.90 → rounds back to ₱10
        let option = SellableOption::priced(pesos(10)).with_discount_percent(1.0);
        let resolved = resolve_effective_price(&option);
        assert_eq!(resolved.effective_price, pesos(10));
        assert!(!resolved.has_sale);
    }

    #[test]
    fn test_fractional_percentage_rounds_once() {
        // round(200 × (1 − 0.002501)) = round(199.4998) = 199
        let option = SellableOption::priced(pesos(200)).with_discount_percent(0.2501);
        assert_eq!(
            resolve_effective_price(&option),
            EffectivePrice {
                effective_price: pesos(199),
                has_sale: true
            }
        );
    }

    #[test]
    fn test_negative_or_nan_percentage_ignored() {
        let option = SellableOption::priced(pesos(100)).with_discount_percent(-20.0);
        assert!(!resolve_effective_price(&option).has_sale);

        let option = SellableOption::priced(pesos(100)).with_discount_percent(f64::NAN);
        assert_eq!(resolve_effective_price(&option).effective_price, pesos(100));
    }

    #[test]
    fn test_negative_price_floors_at_zero() {
        let option = SellableOption::priced(Money::from_cents(-500));
        assert_eq!(resolve_effective_price(&option).effective_price, Money::zero());
    }

    #[test]
    fn test_aggregate_has_sale_from_middle_option() {
        // The sale option sets neither min nor max.
        let options = [
            SellableOption::priced(pesos(100)),
            SellableOption::priced(pesos(300)).with_sale_price(pesos(250)),
            SellableOption::priced(pesos(500)),
        ];
        let range = aggregate_range(&options);
        assert_eq!(range.min, pesos(100));
        assert_eq!(range.max, pesos(500));
        assert!(range.has_sale);
    }

    #[test]
    fn test_product_helpers() {
        let product = Product::new("p-1", "Denim Jacket", pesos(900))
            .with_option(SellableOption::priced(pesos(900)))
            .with_option(SellableOption::priced(pesos(800)).with_discount_percent(10.0));
        assert_eq!(product.from_price(), pesos(720));
        assert!(product.has_sale());

        let bare = Product::new("p-2", "Scarf", pesos(150));
        assert_eq!(bare.from_price(), pesos(150));
        assert!(!bare.has_sale());
    }

    fn arb_option() -> impl Strategy<Value = SellableOption> {
        (
            0i64..10_000_000,
            proptest::option::of(-1_000i64..10_000_000),
            proptest::option::of(0u32..2_000_000),
        )
            .prop_map(|(price, sale, ppm)| SellableOption {
                price: Money::from_cents(price),
                sale_price: sale.map(Money::from_cents),
                discount: ppm.map(DiscountRate::from_ppm),
            })
    }

    proptest! {
        #[test]
        fn prop_effective_price_within_bounds(option in arb_option()) {
            let resolved = resolve_effective_price(&option);
            prop_assert!(resolved.effective_price >= Money::zero());
            prop_assert!(resolved.effective_price <= option.price);
            prop_assert_eq!(resolved.has_sale, resolved.effective_price < option.price);
        }

        #[test]
        fn prop_plain_price_is_identity(cents in 0i64..10_000_000) {
            let option = SellableOption::priced(Money::from_cents(cents));
            let resolved = resolve_effective_price(&option);
            prop_assert_eq!(resolved.effective_price, option.price);
            prop_assert!(!resolved.has_sale);
        }

        #[test]
        fn prop_range_is_ordered_and_sale_is_any(options in proptest::collection::vec(arb_option(), 1..12)) {
            let range = aggregate_range(&options);
            prop_assert!(range.min <= range.max);
            let any_sale = options.iter().any(|o| resolve_effective_price(o).has_sale);
            prop_assert_eq!(range.has_sale, any_sale);
        }
    }
}
