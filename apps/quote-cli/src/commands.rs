//! # Commands
//!
//! Each command reads its inputs, asks the engine, and renders a string for
//! stdout. Nothing here makes a pricing decision of its own.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price      ──► pricing::resolve_effective_price ──► EffectivePrice     │
//! │  range      ──► Product::price_range            ──► [RangeEntry]        │
//! │  tier       ──► loyalty::tier_progress + perks  ──► TierReport          │
//! │  quote      ──► checkout::quote_checkout        ──► CheckoutQuote       │
//! │  recommend  ──► recommend::recommend_similar    ──► [Recommendation]    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use reshelf_core::loyalty::{tier_progress, TierPerks, TierProgress};
use reshelf_core::money::Money;
use reshelf_core::records::{parse_timestamp, OptionRecord};
use reshelf_core::recommend::{find_product, recommend_similar, similarity_score};
use reshelf_core::{quote_checkout, Product, ProductPriceRange, SellableOption};

use crate::cli::Command;
use crate::config::QuoteConfig;
use crate::error::{CliError, CliResult};
use crate::snapshot::{read_catalog, read_json, QuoteSnapshot};

// =============================================================================
// Output Records
// =============================================================================

/// One product's price range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeEntry {
    pub id: String,
    pub title: String,
    pub range: ProductPriceRange,
}

/// Tier, progress and perks for one spend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierReport {
    pub display_name: &'static str,
    pub progress: TierProgress,
    pub perks: TierPerks,
}

/// One recommended product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub score: u32,
    pub from_price: Money,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs a command and returns what should be printed.
pub fn execute(command: &Command, config: &QuoteConfig) -> CliResult<String> {
    let symbol = config.currency.symbol.as_str();

    match command {
        Command::Price {
            price,
            sale_price,
            discount_percent,
            plain,
        } => {
            let option = SellableOption::from(OptionRecord {
                price: Some(*price),
                sale_price: *sale_price,
                discount_percent: *discount_percent,
            });
            let resolved = option.effective_price();
            debug!(?option, ?resolved, "Resolved option price");

            if *plain {
                Ok(resolved.effective_price.format_with_symbol(symbol))
            } else {
                render(&resolved)
            }
        }

        Command::Range {
            catalog,
            product_id,
            plain,
        } => {
            let catalog = read_catalog(catalog)?;
            let products: Vec<&Product> = match product_id {
                Some(id) => vec![find_product(&catalog, id)?],
                None => catalog.iter().collect(),
            };

            let entries: Vec<RangeEntry> = products
                .into_iter()
                .map(|product| RangeEntry {
                    id: product.id.clone(),
                    title: product.title.clone(),
                    range: product.price_range(),
                })
                .collect();

            if *plain {
                Ok(entries
                    .iter()
                    .map(|entry| format!("{}\t{}", entry.id, format_range(&entry.range, symbol)))
                    .collect::<Vec<_>>()
                    .join("\n"))
            } else {
                render(&entries)
            }
        }

        Command::Tier { spend, plain } => {
            let progress = tier_progress(Money::from_major(*spend));
            let report = TierReport {
                display_name: progress.tier.display_name(),
                progress,
                perks: progress.tier.perks(),
            };

            if *plain {
                Ok(report.display_name.to_string())
            } else {
                render(&report)
            }
        }

        Command::Quote {
            snapshot,
            now,
            plain,
        } => {
            let now = match now.as_deref() {
                Some(raw) => Some(parse_timestamp("--now", Some(raw)).ok_or_else(|| {
                    CliError::invalid_argument("--now", format!("unparseable instant {raw:?}"))
                })?),
                None => None,
            };

            let input = read_json::<QuoteSnapshot>(snapshot)?.into_input(now, Utc::now)?;
            let quote = quote_checkout(&input)?;
            info!(
                total = quote.total.cents(),
                tier = %quote.tier,
                applied = quote.applied_voucher.as_ref().map(|v| v.voucher_id.as_str()),
                "Checkout quoted"
            );

            if *plain {
                Ok(quote.total.format_with_symbol(symbol))
            } else {
                render(&quote)
            }
        }

        Command::Recommend {
            catalog,
            product_id,
            limit,
        } => {
            let catalog = read_catalog(catalog)?;
            let target = find_product(&catalog, product_id)?;
            let limit = limit.unwrap_or(config.recommend.limit);

            let picks: Vec<Recommendation> = recommend_similar(&catalog, target, limit)
                .into_iter()
                .map(|product| Recommendation {
                    id: product.id.clone(),
                    title: product.title.clone(),
                    score: similarity_score(target, product),
                    from_price: product.from_price(),
                })
                .collect();

            render(&picks)
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `₱300.00 - ₱450.00`, or a single amount when min equals max.
pub fn format_range(range: &ProductPriceRange, symbol: &str) -> String {
    if range.is_single_price() {
        range.min.format_with_symbol(symbol)
    } else {
        format!(
            "{} - {}",
            range.min.format_with_symbol(symbol),
            range.max.format_with_symbol(symbol)
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn run(command: Command) -> CliResult<String> {
        execute(&command, &QuoteConfig::default())
    }

    fn run_json(command: Command) -> Value {
        serde_json::from_str(&run(command).unwrap()).unwrap()
    }

    const CATALOG: &str = r#"[
        { "id": "jkt", "title": "Vintage Denim Jacket", "brand": "Lee", "price": 1500,
          "options": [{ "price": 1500 }, { "price": 1800, "sale_price": 1600 }] },
        { "id": "skirt", "title": "Denim Skirt", "price": 9000 },
        { "id": "coat", "title": "Corduroy Coat", "brand": "LEE", "price": 1400 },
        { "id": "scarf", "title": "Silk Scarf", "price": 100 }
    ]"#;

    #[test]
    fn test_price_json_and_plain() {
        let json = run_json(Command::Price {
            price: 500.0,
            sale_price: Some(400.0),
            discount_percent: None,
            plain: false,
        });
        assert_eq!(json["effectivePrice"], 40_000);
        assert_eq!(json["hasSale"], true);

        let plain = run(Command::Price {
            price: 1_000.0,
            sale_price: None,
            discount_percent: Some(15.0),
            plain: true,
        })
        .unwrap();
        assert_eq!(plain, "₱850.00");
    }

    #[test]
    fn test_plain_uses_configured_symbol() {
        let mut config = QuoteConfig::default();
        config.currency.symbol = "PHP ".into();
        let out = execute(
            &Command::Price {
                price: 1_234.5,
                sale_price: None,
                discount_percent: None,
                plain: true,
            },
            &config,
        )
        .unwrap();
        assert_eq!(out, "PHP 1,234.50");
    }

    #[test]
    fn test_range_single_and_all() {
        let catalog = json_file(CATALOG);

        let json = run_json(Command::Range {
            catalog: catalog.path().to_path_buf(),
            product_id: Some("jkt".into()),
            plain: false,
        });
        assert_eq!(json[0]["range"]["min"], 150_000);
        assert_eq!(json[0]["range"]["max"], 160_000);
        assert_eq!(json[0]["range"]["hasSale"], true);

        let plain = run(Command::Range {
            catalog: catalog.path().to_path_buf(),
            product_id: None,
            plain: true,
        })
        .unwrap();
        let first = plain.lines().next().unwrap();
        assert_eq!(first, "jkt\t₱1,500.00 - ₱1,600.00");
        assert_eq!(plain.lines().count(), 4);
    }

    #[test]
    fn test_range_unknown_product() {
        let catalog = json_file(CATALOG);
        let err = run(Command::Range {
            catalog: catalog.path().to_path_buf(),
            product_id: Some("nope".into()),
            plain: false,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Product not found: nope");
    }

    #[test]
    fn test_tier_report() {
        let json = run_json(Command::Tier {
            spend: 6_200.0,
            plain: false,
        });
        assert_eq!(json["progress"]["tier"], "GOLD");
        assert_eq!(json["perks"]["autoApprove"], true);
        assert_eq!(json["perks"]["priorityShipping"], false);

        let plain = run(Command::Tier {
            spend: 12_000.0,
            plain: true,
        })
        .unwrap();
        assert_eq!(plain, "Platinum");
    }

    #[test]
    fn test_quote_snapshot() {
        let snapshot = json_file(
            r#"{
                "lines": [{ "option": { "price": 500, "sale_price": 400 }, "quantity": 3 }],
                "shipping_fee": 150,
                "lifetime_spend": 6200,
                "claims": [{
                    "voucher": { "id": "v-gold", "min_subtotal": 1000, "shipping_cap": 200 },
                    "wallet": { "voucher_id": "v-gold", "status": "AVAILABLE" }
                }],
                "now": "2024-06-15T12:00:00Z"
            }"#,
        );

        let json = run_json(Command::Quote {
            snapshot: snapshot.path().to_path_buf(),
            now: None,
            plain: false,
        });
        assert_eq!(json["subtotal"], 120_000);
        assert_eq!(json["shippingDiscount"], 15_000);
        assert_eq!(json["total"], 120_000);
        assert_eq!(json["tier"], "GOLD");
        assert_eq!(json["appliedVoucher"]["voucherId"], "v-gold");

        let plain = run(Command::Quote {
            snapshot: snapshot.path().to_path_buf(),
            now: None,
            plain: true,
        })
        .unwrap();
        assert_eq!(plain, "₱1,200.00");
    }

    #[test]
    fn test_quote_now_flag_can_expire_voucher() {
        let snapshot = json_file(
            r#"{
                "lines": [{ "option": { "price": 1200 } }],
                "shipping_fee": 150,
                "claims": [{
                    "voucher": { "id": "v", "min_subtotal": 0, "shipping_cap": 200,
                                 "expires_at": "2024-06-30" },
                    "wallet": { "voucher_id": "v" }
                }]
            }"#,
        );

        let json = run_json(Command::Quote {
            snapshot: snapshot.path().to_path_buf(),
            now: Some("2024-07-01T00:00:00Z".into()),
            plain: false,
        });
        assert_eq!(json["vouchers"][0]["eligibility"]["reason"], "voucher expired.");
        assert_eq!(json["total"], 135_000);

        let err = run(Command::Quote {
            snapshot: snapshot.path().to_path_buf(),
            now: Some("tomorrow".into()),
            plain: false,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_quote_empty_snapshot_is_an_error() {
        let snapshot = json_file(r#"{ "lines": [], "now": "2024-06-15" }"#);
        let err = run(Command::Quote {
            snapshot: snapshot.path().to_path_buf(),
            now: None,
            plain: false,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Checkout has no items");
    }

    #[test]
    fn test_recommend() {
        let catalog = json_file(CATALOG);
        let json = run_json(Command::Recommend {
            catalog: catalog.path().to_path_buf(),
            product_id: "jkt".into(),
            limit: None,
        });
        let ids: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        // coat: brand token + brand match + price band = 4; skirt: "denim" = 1
        assert_eq!(ids, vec!["coat", "skirt"]);
        assert_eq!(json[0]["score"], 4);
        assert_eq!(json[0]["fromPrice"], 140_000);
    }

    #[test]
    fn test_recommend_respects_limit_and_missing_file() {
        let catalog = json_file(CATALOG);
        let json = run_json(Command::Recommend {
            catalog: catalog.path().to_path_buf(),
            product_id: "jkt".into(),
            limit: Some(1),
        });
        assert_eq!(json.as_array().unwrap().len(), 1);

        let err = run(Command::Recommend {
            catalog: PathBuf::from("/definitely/not/here.json"),
            product_id: "jkt".into(),
            limit: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_format_range() {
        let single = ProductPriceRange {
            min: Money::from_pesos(5),
            max: Money::from_pesos(5),
            has_sale: false,
        };
        assert_eq!(format_range(&single, "₱"), "₱5.00");
    }
}
