//! Search and status filtering for the row table

use std::str::FromStr;

use thiserror::Error;

use crate::model::{EnrichedRow, Status};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status filter '{0}' (expected all, fully-paid, partial or unpaid)")]
pub struct ParseStatusFilterError(pub String);

/// Status selector of the row table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "fully-paid" | "fully paid" | "fully_paid" | "fullypaid" => Ok(StatusFilter::Only(Status::FullyPaid)),
            "partial" => Ok(StatusFilter::Only(Status::Partial)),
            "unpaid" => Ok(StatusFilter::Only(Status::Unpaid)),
            _ => Err(ParseStatusFilterError(s.to_string())),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Current search text and status selection. Updates return a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
}

impl FilterState {
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    pub fn with_status(self, status: StatusFilter) -> Self {
        Self { status, ..self }
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    /// True when nothing is filtered; clearing is then a no-op
    pub fn is_default(&self) -> bool {
        self.search.trim().is_empty() && self.status == StatusFilter::All
    }

    pub fn matches(&self, row: &EnrichedRow) -> bool {
        self.status.matches(row.status) && matches_search(row, &self.search)
    }

    pub fn apply<'a>(&self, rows: &'a [EnrichedRow]) -> Vec<&'a EnrichedRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

fn matches_search(row: &EnrichedRow, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    if row.raw.family_members.to_lowercase().contains(&needle) {
        return true;
    }
    if row.raw.no.is_some_and(|no| no.to_string().contains(&needle)) {
        return true;
    }
    row.raw
        .monthly_amount
        .is_some_and(|amount| format_amount(amount).contains(&needle))
}

/// Whole amounts print without a fractional part
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        amount.to_string()
    }
}
