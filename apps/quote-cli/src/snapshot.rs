//! # Snapshot Files
//!
//! JSON exports of storefront rows, read once and handed to the engine.
//!
//! ## Quote Snapshot Format
//! ```json
//! {
//!   "lines": [
//!     { "option": { "price": 500, "sale_price": 400 }, "quantity": 3 }
//!   ],
//!   "shipping_fee": 150,
//!   "lifetime_spend": 6200,
//!   "claims": [
//!     {
//!       "voucher": { "id": "v-gold", "min_subtotal": 1000, "shipping_cap": 200 },
//!       "wallet": { "voucher_id": "v-gold", "status": "AVAILABLE" }
//!     }
//!   ],
//!   "now": "2024-06-15T12:00:00Z"
//! }
//! ```
//!
//! Amounts are in pesos, as stored. A catalog file is a JSON array of
//! product rows.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use reshelf_core::checkout::{CheckoutInput, CheckoutLine};
use reshelf_core::money::Money;
use reshelf_core::records::{parse_timestamp, ClaimRecord, OptionRecord, ProductRecord};
use reshelf_core::voucher::WalletClaim;
use reshelf_core::{CoreResult, Product, SellableOption};

use crate::error::{CliError, CliResult};

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a catalog file into typed products.
pub fn read_catalog(path: &Path) -> CliResult<Vec<Product>> {
    let records: Vec<ProductRecord> = read_json(path)?;
    let catalog = records
        .into_iter()
        .map(Product::try_from)
        .collect::<CoreResult<Vec<_>>>()?;
    debug!(?path, products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

// =============================================================================
// Quote Snapshot
// =============================================================================

/// One cart line as exported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineRecord {
    pub option: OptionRecord,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

/// A whole checkout as exported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub shipping_fee: Option<f64>,
    #[serde(default)]
    pub lifetime_spend: Option<f64>,
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
    /// Evaluation instant; the caller's clock is used when absent.
    #[serde(default)]
    pub now: Option<String>,
}

impl QuoteSnapshot {
    /// Normalizes the snapshot into engine input.
    ///
    /// `now` overrides the snapshot's own instant. A snapshot instant that
    /// does not parse is an error rather than "no constraint".
    pub fn into_input(
        self,
        now: Option<DateTime<Utc>>,
        clock: impl FnOnce() -> DateTime<Utc>,
    ) -> CliResult<CheckoutInput> {
        let now = match (now, self.now.as_deref()) {
            (Some(now), _) => now,
            (None, Some(raw)) => parse_timestamp("now", Some(raw)).ok_or_else(|| {
                CliError::invalid_argument("now", format!("unparseable instant {raw:?}"))
            })?,
            (None, None) => clock(),
        };

        let lines = self
            .lines
            .into_iter()
            .map(|line| CheckoutLine::new(SellableOption::from(line.option), line.quantity))
            .collect();

        let claims = self
            .claims
            .into_iter()
            .map(WalletClaim::try_from)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(CheckoutInput {
            lines,
            shipping_fee: Money::from_major(self.shipping_fee.unwrap_or(0.0)),
            lifetime_spend: Money::from_major(self.lifetime_spend.unwrap_or(0.0)),
            claims,
            now,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
