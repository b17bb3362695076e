//! Row normalization: raw sheet rows to enriched rows
//!
//! A month counts as paid when its value is present and strictly positive.
//! Pending months and the paid-month count are both derived from that one
//! predicate.

use crate::model::{EnrichedRow, MonthKey, RawRow, Status};

/// Months in a collection year
const MONTHS_PER_YEAR: f64 = 12.0;

/// Amounts below zero or non-finite never contribute to a total
pub(crate) fn clamp_amount(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn is_paid(value: Option<f64>) -> bool {
    value.is_some_and(|v| v > 0.0)
}

pub fn normalize_rows(rows: &[RawRow]) -> Vec<EnrichedRow> {
    rows.iter().map(normalize_row).collect()
}

pub fn normalize_row(row: &RawRow) -> EnrichedRow {
    let collected_year = MonthKey::ALL
        .iter()
        .map(|&month| row.month(month).map(clamp_amount).unwrap_or(0.0))
        .sum();

    let expected_year = clamp_amount(row.monthly_amount.unwrap_or(0.0)) * MONTHS_PER_YEAR;

    let pending_months: Vec<MonthKey> = MonthKey::ALL
        .into_iter()
        .filter(|&month| !is_paid(row.month(month)))
        .collect();

    let paid_months_count = MonthKey::ALL.len() - pending_months.len();
    let status = Status::from_paid_months(paid_months_count);

    EnrichedRow {
        raw: row.clone(),
        collected_year,
        expected_year,
        paid_months_count,
        fully_paid: paid_months_count == MonthKey::ALL.len(),
        pending_months,
        status,
    }
}

impl EnrichedRow {
    /// Amount still owed against the pledge (never negative)
    pub fn outstanding(&self) -> f64 {
        (self.expected_year - self.collected_year).max(0.0)
    }

    /// Collected as a percentage of expected, 0 when nothing is pledged
    pub fn collection_percentage(&self) -> f64 {
        if self.expected_year > 0.0 {
            self.collected_year / self.expected_year * 100.0
        } else {
            0.0
        }
    }

    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_percentage(self.collection_percentage())
    }
}

/// Contribution standing shown next to each family in the table view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Perfect,
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl PerformanceTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            PerformanceTier::Perfect
        } else if percentage >= 80.0 {
            PerformanceTier::Excellent
        } else if percentage >= 60.0 {
            PerformanceTier::Good
        } else if percentage >= 40.0 {
            PerformanceTier::Fair
        } else {
            PerformanceTier::NeedsAttention
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceTier::Perfect => write!(f, "Perfect"),
            PerformanceTier::Excellent => write!(f, "Excellent"),
            PerformanceTier::Good => write!(f, "Good"),
            PerformanceTier::Fair => write!(f, "Fair"),
            PerformanceTier::NeedsAttention => write!(f, "Needs Attention"),
        }
    }
}
