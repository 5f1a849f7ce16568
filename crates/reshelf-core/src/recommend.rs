//! # Recommendation Module
//!
//! Content and price similarity scoring for "you may also like" rails.
//!
//! ## Scoring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  target:    "Levi's 501 Jeans"  brand=Levi's  ₱1,200                    │
//! │  candidate: "Levi's 505 Jeans"  brand=levi's  ₱1,000                    │
//! │                                                                         │
//! │  tokens overlap   {levis, jeans}                       +2               │
//! │  brand match      case-insensitive                     +2               │
//! │  price band       |1000 − 1200| <= 20% of 1200         +1               │
//! │                                                        ──               │
//! │  score                                                  5               │
//! │                                                                         │
//! │  Sort by score desc (stable), drop zeros, keep `limit`.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

/// Default number of recommendations returned.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 6;

/// Bonus for a case-insensitive brand match.
const BRAND_MATCH_BONUS: u32 = 2;

/// Bonus for a candidate priced within 20% of the target.
const PRICE_BAND_BONUS: u32 = 1;

/// Splits text into lowercase ASCII-alphanumeric tokens.
///
/// Non-alphanumeric characters are removed (not treated as separators), so
/// "Levi's" becomes "levis".
///
/// ```rust
/// use reshelf_core::recommend::tokenize;
///
/// assert_eq!(tokenize("Levi's 501  Jeans!"), vec!["levis", "501", "jeans"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn product_tokens(product: &Product) -> HashSet<String> {
    let text = [
        Some(product.title.as_str()),
        product.brand.as_deref(),
        product.model.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    tokenize(&text).into_iter().collect()
}

fn normalized_brand(product: &Product) -> Option<String> {
    product
        .brand
        .as_deref()
        .map(str::trim)
        .filter(|brand| !brand.is_empty())
        .map(str::to_lowercase)
}

/// True when `candidate` is within 20% of a positive `target` price.
fn within_price_band(target: Money, candidate: Money) -> bool {
    if !target.is_positive() {
        return false;
    }
    // |c - t| <= t / 5, in i128 so storage extremes cannot overflow
    let target = target.cents() as i128;
    (candidate.cents() as i128 - target).abs() * 5 <= target
}

/// Similarity score of `candidate` against `target`.
pub fn similarity_score(target: &Product, candidate: &Product) -> u32 {
    let target_tokens = product_tokens(target);
    score_against(&target_tokens, normalized_brand(target).as_deref(), target, candidate)
}

fn score_against(
    target_tokens: &HashSet<String>,
    target_brand: Option<&str>,
    target: &Product,
    candidate: &Product,
) -> u32 {
    let overlap = product_tokens(candidate)
        .iter()
        .filter(|token| target_tokens.contains(*token))
        .count() as u32;

    let brand = match (target_brand, normalized_brand(candidate)) {
        (Some(t), Some(c)) if t == c => BRAND_MATCH_BONUS,
        _ => 0,
    };

    let price = if within_price_band(target.price, candidate.price) {
        PRICE_BAND_BONUS
    } else {
        0
    };

    overlap + brand + price
}

/// Returns up to `limit` catalog products most similar to `target`.
///
/// The target (matched by id) is never included, zero scores are dropped,
/// and ties keep catalog order.
///
/// ```rust
/// use reshelf_core::money::Money;
/// use reshelf_core::recommend::recommend_similar;
/// use reshelf_core::types::Product;
///
/// let target = Product::new("1", "Nike Air Max", Money::from_pesos(3_000)).with_brand("Nike");
/// let catalog = vec![
///     target.clone(),
///     Product::new("2", "Wool Scarf", Money::from_pesos(400)),
///     Product::new("3", "Nike Air Force", Money::from_pesos(2_800)).with_brand("NIKE"),
/// ];
///
/// let picks = recommend_similar(&catalog, &target, 6);
/// let ids: Vec<&str> = picks.iter().map(|p| p.id.as_str()).collect();
/// assert_eq!(ids, vec!["3"]);
/// ```
pub fn recommend_similar<'a>(
    catalog: &'a [Product],
    target: &Product,
    limit: usize,
) -> Vec<&'a Product> {
    let target_tokens = product_tokens(target);
    let target_brand = normalized_brand(target);

    let mut scored: Vec<(u32, &Product)> = catalog
        .iter()
        .filter(|candidate| candidate.id != target.id)
        .map(|candidate| {
            let score = score_against(&target_tokens, target_brand.as_deref(), target, candidate);
            (score, candidate)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by is stable: equal scores keep catalog order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);

    debug!(
        target_id = %target.id,
        candidates = catalog.len(),
        returned = scored.len(),
        "Scored recommendations"
    );

    scored.into_iter().map(|(_, product)| product).collect()
}

/// Looks a product up by id.
pub fn find_product<'a>(catalog: &'a [Product], id: &str) -> CoreResult<&'a Product> {
    catalog
        .iter()
        .find(|product| product.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
