//! # Command-Line Arguments
//!
//! ```text
//! reshelf-quote [--config quote.toml] <COMMAND>
//!
//!   price      --price 500 [--sale-price 400] [--discount-percent 20] [--plain]
//!   range      --catalog products.json [--product-id p-1] [--plain]
//!   tier       --spend 6200 [--plain]
//!   quote      checkout.json [--now 2024-06-15T12:00:00Z] [--plain]
//!   recommend  --catalog products.json --product-id p-1 [--limit 4]
//! ```
//!
//! Amounts are pesos. JSON goes to stdout, logs to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "reshelf-quote",
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "(Optional) Path to quote.toml. Defaults to the platform config directory."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve the price a shopper pays for one option.
    Price {
        #[arg(long, allow_negative_numbers = true, help = "Reference price in pesos.")]
        price: f64,

        #[arg(long, allow_negative_numbers = true, help = "(Optional) Fixed sale price.")]
        sale_price: Option<f64>,

        #[arg(long, allow_negative_numbers = true, help = "(Optional) Percentage off.")]
        discount_percent: Option<f64>,

        #[arg(long, help = "Print only the formatted amount.")]
        plain: bool,
    },

    /// Show the price range of catalog products.
    Range {
        #[arg(long, help = "JSON array of product rows.")]
        catalog: PathBuf,

        #[arg(long, help = "(Optional) Only this product.")]
        product_id: Option<String>,

        #[arg(long, help = "Print formatted ranges, one per line.")]
        plain: bool,
    },

    /// Resolve the loyalty tier for a lifetime spend.
    Tier {
        #[arg(long, allow_negative_numbers = true, help = "Lifetime spend in pesos.")]
        spend: f64,

        #[arg(long, help = "Print only the tier name.")]
        plain: bool,
    },

    /// Quote a checkout snapshot.
    Quote {
        #[arg(help = "JSON checkout snapshot.")]
        snapshot: PathBuf,

        #[arg(long, help = "(Optional) Evaluation instant, overriding the snapshot's.")]
        now: Option<String>,

        #[arg(long, help = "Print only the formatted total.")]
        plain: bool,
    },

    /// Recommend similar products.
    Recommend {
        #[arg(long, help = "JSON array of product rows.")]
        catalog: PathBuf,

        #[arg(long, help = "Product to find neighbours for.")]
        product_id: String,

        #[arg(long, help = "(Optional) Number of results. Defaults to recommend.limit.")]
        limit: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price_with_negative_amount() {
        let cli = Cli::try_parse_from([
            "reshelf-quote",
            "price",
            "--price",
            "-5",
            "--discount-percent",
            "10",
        ])
        .unwrap();
        match cli.command {
            Command::Price {
                price,
                sale_price,
                discount_percent,
                plain,
            } => {
                assert_eq!(price, -5.0);
                assert_eq!(sale_price, None);
                assert_eq!(discount_percent, Some(10.0));
                assert!(!plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "reshelf-quote",
            "tier",
            "--spend",
            "6200",
            "--config",
            "/tmp/quote.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/quote.toml")));
    }

    #[test]
    fn test_recommend_requires_product_id() {
        assert!(Cli::try_parse_from(["reshelf-quote", "recommend", "--catalog", "c.json"]).is_err());
    }
}
