//! Fund statements served from the static configuration
//!
//! These figures come from `shared::CONFIG`, not from the sheet.

use serde::Serialize;
use shared::{Config, CONFIG};

use crate::aggregate::percentage;

/// Round to `places` decimal places
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// =============================================================================
// Financial Balance
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialBalance {
    pub existing_balance_2024: f64,
    pub art_competition_balance_2025: f64,
    pub monthly_collection_balance: f64,
    pub account_opening_balance: f64,
    pub sadaka: f64,
    pub total_collection_in_hand: f64,
}

impl FinancialBalance {
    pub fn from_config() -> Self {
        Self::from(&CONFIG)
    }
}

impl From<&Config> for FinancialBalance {
    fn from(config: &Config) -> Self {
        let b = &config.balances;
        let total = b.existing_balance_2024
            + b.art_competition_balance_2025
            + b.monthly_collection_balance
            + b.account_opening_balance
            + b.sadaka;

        Self {
            existing_balance_2024: b.existing_balance_2024,
            art_competition_balance_2025: b.art_competition_balance_2025,
            monthly_collection_balance: b.monthly_collection_balance,
            account_opening_balance: b.account_opening_balance,
            sadaka: b.sadaka,
            total_collection_in_hand: round_to(total, 2),
        }
    }
}

// =============================================================================
// Financial Summary
// =============================================================================

/// Recorded collections keyed by lower-case month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCollections {
    pub jan: f64,
    pub feb: f64,
    pub mar: f64,
    pub apr: f64,
    pub may: f64,
    pub jun: f64,
    pub jul: f64,
    pub aug: f64,
    pub sep: f64,
    pub oct: f64,
    pub nov: f64,
    pub dec: f64,
    pub total_year: f64,
}

impl MonthlyCollections {
    fn from_months(m: &[f64; 12]) -> Self {
        Self {
            jan: m[0],
            feb: m[1],
            mar: m[2],
            apr: m[3],
            may: m[4],
            jun: m[5],
            jul: m[6],
            aug: m[7],
            sep: m[8],
            oct: m[9],
            nov: m[10],
            dec: m[11],
            total_year: round_to(m.iter().sum(), 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedTotals {
    pub total_per_month: f64,
    pub total_year_expected: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProgress {
    /// Percentage, one decimal place
    pub collected_vs_expected: f64,
    pub monthly_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub cash_on_hand: FinancialBalance,
    pub monthly_collections: MonthlyCollections,
    pub expected_totals: ExpectedTotals,
    pub collection_progress: CollectionProgress,
}

impl FinancialSummary {
    pub fn from_config() -> Self {
        Self::from(&CONFIG)
    }
}

impl From<&Config> for FinancialSummary {
    fn from(config: &Config) -> Self {
        let monthly_collections = MonthlyCollections::from_months(&config.collections.monthly);
        let total_per_month = config.collections.expected_per_month;
        let total_year_expected = total_per_month * 12.0;
        let total_year = monthly_collections.total_year;

        Self {
            cash_on_hand: FinancialBalance::from(config),
            expected_totals: ExpectedTotals {
                total_per_month,
                total_year_expected,
            },
            collection_progress: CollectionProgress {
                collected_vs_expected: round_to(percentage(total_year, total_year_expected), 1),
                monthly_average: round_to(total_year / 12.0, 2),
            },
            monthly_collections,
        }
    }
}
