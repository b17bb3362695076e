//! Collection sheet data model
//!
//! Field names serialize in camelCase and statuses as their display strings,
//! which is the shape the dashboard front end reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Month column of the collection sheet, in calendar order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MonthKey {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl MonthKey {
    pub const ALL: [MonthKey; 12] = [
        MonthKey::Jan,
        MonthKey::Feb,
        MonthKey::Mar,
        MonthKey::Apr,
        MonthKey::May,
        MonthKey::Jun,
        MonthKey::Jul,
        MonthKey::Aug,
        MonthKey::Sep,
        MonthKey::Oct,
        MonthKey::Nov,
        MonthKey::Dec,
    ];

    /// Zero-based position in the calendar
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            MonthKey::Jan => "Jan",
            MonthKey::Feb => "Feb",
            MonthKey::Mar => "Mar",
            MonthKey::Apr => "Apr",
            MonthKey::May => "May",
            MonthKey::Jun => "Jun",
            MonthKey::Jul => "Jul",
            MonthKey::Aug => "Aug",
            MonthKey::Sep => "Sep",
            MonthKey::Oct => "Oct",
            MonthKey::Nov => "Nov",
            MonthKey::Dec => "Dec",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            MonthKey::Jan => "January",
            MonthKey::Feb => "February",
            MonthKey::Mar => "March",
            MonthKey::Apr => "April",
            MonthKey::May => "May",
            MonthKey::Jun => "June",
            MonthKey::Jul => "July",
            MonthKey::Aug => "August",
            MonthKey::Sep => "September",
            MonthKey::Oct => "October",
            MonthKey::Nov => "November",
            MonthKey::Dec => "December",
        }
    }

    /// Match a normalized (lower-case, trimmed) header label
    pub fn from_label(label: &str) -> Option<MonthKey> {
        MonthKey::ALL.into_iter().find(|month| {
            label == month.abbrev().to_ascii_lowercase() || label == month.full_name().to_ascii_lowercase()
        })
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// Sparse month → collected amount mapping as read from the sheet
pub type MonthValues = BTreeMap<MonthKey, Option<f64>>;

/// One contributor record from the sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default)]
    pub no: Option<u32>,
    #[serde(default)]
    pub family_members: String,
    #[serde(default)]
    pub monthly_amount: Option<f64>,
    #[serde(default)]
    pub months: MonthValues,
    /// Total as typed in the sheet; computed totals are used instead
    #[serde(default)]
    pub total_year: Option<f64>,
}

impl RawRow {
    pub fn month(&self, month: MonthKey) -> Option<f64> {
        self.months.get(&month).copied().flatten()
    }
}

/// Payment completeness against the 12-month calendar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "Fully Paid")]
    FullyPaid,
    Partial,
    Unpaid,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::FullyPaid, Status::Partial, Status::Unpaid];

    pub fn from_paid_months(paid_months_count: usize) -> Status {
        match paid_months_count {
            0 => Status::Unpaid,
            n if n >= MonthKey::ALL.len() => Status::FullyPaid,
            _ => Status::Partial,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::FullyPaid => write!(f, "Fully Paid"),
            Status::Partial => write!(f, "Partial"),
            Status::Unpaid => write!(f, "Unpaid"),
        }
    }
}

/// A row with its derived yearly figures and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRow {
    #[serde(flatten)]
    pub raw: RawRow,
    pub collected_year: f64,
    pub expected_year: f64,
    pub paid_months_count: usize,
    pub fully_paid: bool,
    pub pending_months: Vec<MonthKey>,
    pub status: Status,
}

/// Sum collected per month across all rows; always holds all 12 keys
pub type MonthlyTotals = BTreeMap<MonthKey, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub contributors: usize,
    pub fully_paid: usize,
    pub partially_unpaid: usize,
    pub fully_paid_percentage: f64,
    pub expected_total: f64,
    pub collected_total: f64,
    pub collected_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    #[serde(rename = "Fully Paid")]
    pub fully_paid: usize,
    #[serde(rename = "Partial")]
    pub partial: usize,
    #[serde(rename = "Unpaid")]
    pub unpaid: usize,
}

impl StatusDistribution {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::FullyPaid => self.fully_paid,
            Status::Partial => self.partial,
            Status::Unpaid => self.unpaid,
        }
    }

    pub fn total(&self) -> usize {
        self.fully_paid + self.partial + self.unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_order_matches_calendar() {
        for (i, month) in MonthKey::ALL.iter().enumerate() {
            assert_eq!(month.index(), i);
        }
        assert!(MonthKey::Jan < MonthKey::Dec);
    }

    #[test]
    fn test_month_from_label() {
        assert_eq!(MonthKey::from_label("jan"), Some(MonthKey::Jan));
        assert_eq!(MonthKey::from_label("september"), Some(MonthKey::Sep));
        assert_eq!(MonthKey::from_label("january 2025"), None);
        assert_eq!(MonthKey::from_label("family members"), None);
    }

    #[test]
    fn test_status_from_paid_months() {
        assert_eq!(Status::from_paid_months(0), Status::Unpaid);
        assert_eq!(Status::from_paid_months(5), Status::Partial);
        assert_eq!(Status::from_paid_months(12), Status::FullyPaid);
    }

    #[test]
    fn test_raw_row_json_shape() {
        let json = r#"{"no":3,"familyMembers":"Perera","monthlyAmount":500,"months":{"Jan":500,"Feb":null}}"#;
        let row: RawRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.no, Some(3));
        assert_eq!(row.family_members, "Perera");
        assert_eq!(row.month(MonthKey::Jan), Some(500.0));
        assert_eq!(row.month(MonthKey::Feb), None);
        assert_eq!(row.month(MonthKey::Mar), None);
        assert_eq!(row.total_year, None);
    }

    #[test]
    fn test_status_serializes_as_display_string() {
        assert_eq!(serde_json::to_string(&Status::FullyPaid).unwrap(), "\"Fully Paid\"");
        let dist = StatusDistribution { fully_paid: 2, partial: 1, unpaid: 0 };
        let value = serde_json::to_value(&dist).unwrap();
        assert_eq!(value["Fully Paid"], 2);
        assert_eq!(value["Unpaid"], 0);
    }
}
